use serde::{Deserialize, Serialize};
use std::fs;

use derby_ai::StrategyKind;
use derby_ai::generator::OllamaConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub games: u32,
    pub seed: Option<u64>,
    pub strategy_a: String,
    pub strategy_b: String,
    pub hint_a: Option<String>,
    pub hint_b: Option<String>,
    pub llm_endpoint: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub games: ValueSource,
    pub seed: ValueSource,
    pub strategy_a: ValueSource,
    pub strategy_b: ValueSource,
    pub hint_a: ValueSource,
    pub hint_b: ValueSource,
    pub llm_endpoint: ValueSource,
    pub llm_model: ValueSource,
    pub llm_timeout_secs: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            games: ValueSource::Default,
            seed: ValueSource::Default,
            strategy_a: ValueSource::Default,
            strategy_b: ValueSource::Default,
            hint_a: ValueSource::Default,
            hint_b: ValueSource::Default,
            llm_endpoint: ValueSource::Default,
            llm_model: ValueSource::Default,
            llm_timeout_secs: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        let llm = OllamaConfig::default();
        Self {
            games: 1,
            seed: None,
            strategy_a: StrategyKind::Random.as_str().into(),
            strategy_b: StrategyKind::Random.as_str().into(),
            hint_a: None,
            hint_b: None,
            llm_endpoint: llm.endpoint,
            llm_model: llm.model,
            llm_timeout_secs: llm.timeout.as_secs(),
        }
    }
}

impl Config {
    /// Text-generator settings shared by both seats.
    pub fn llm(&self) -> OllamaConfig {
        OllamaConfig {
            endpoint: self.llm_endpoint.clone(),
            model: self.llm_model.clone(),
            timeout: std::time::Duration::from_secs(self.llm_timeout_secs),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("DERBY_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.games {
            cfg.games = v;
            sources.games = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.strategy_a {
            cfg.strategy_a = v;
            sources.strategy_a = ValueSource::File;
        }
        if let Some(v) = f.strategy_b {
            cfg.strategy_b = v;
            sources.strategy_b = ValueSource::File;
        }
        if let Some(v) = f.hint_a
            && !v.is_empty()
        {
            cfg.hint_a = Some(v);
            sources.hint_a = ValueSource::File;
        }
        if let Some(v) = f.hint_b
            && !v.is_empty()
        {
            cfg.hint_b = Some(v);
            sources.hint_b = ValueSource::File;
        }
        if let Some(v) = f.llm_endpoint {
            cfg.llm_endpoint = v;
            sources.llm_endpoint = ValueSource::File;
        }
        if let Some(v) = f.llm_model {
            cfg.llm_model = v;
            sources.llm_model = ValueSource::File;
        }
        if let Some(v) = f.llm_timeout_secs {
            cfg.llm_timeout_secs = v;
            sources.llm_timeout_secs = ValueSource::File;
        }
    }

    if let Ok(games) = std::env::var("DERBY_GAMES")
        && !games.is_empty()
    {
        cfg.games = games
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid games".into()))?;
        sources.games = ValueSource::Env;
    }
    if let Ok(seed) = std::env::var("DERBY_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(s) = std::env::var("DERBY_STRATEGY_A")
        && !s.is_empty()
    {
        cfg.strategy_a = s;
        sources.strategy_a = ValueSource::Env;
    }
    if let Ok(s) = std::env::var("DERBY_STRATEGY_B")
        && !s.is_empty()
    {
        cfg.strategy_b = s;
        sources.strategy_b = ValueSource::Env;
    }
    if let Ok(h) = std::env::var("DERBY_HINT_A")
        && !h.is_empty()
    {
        cfg.hint_a = Some(h);
        sources.hint_a = ValueSource::Env;
    }
    if let Ok(h) = std::env::var("DERBY_HINT_B")
        && !h.is_empty()
    {
        cfg.hint_b = Some(h);
        sources.hint_b = ValueSource::Env;
    }
    if let Ok(url) = std::env::var("DERBY_LLM_ENDPOINT")
        && !url.is_empty()
    {
        cfg.llm_endpoint = url;
        sources.llm_endpoint = ValueSource::Env;
    }
    if let Ok(model) = std::env::var("DERBY_LLM_MODEL")
        && !model.is_empty()
    {
        cfg.llm_model = model;
        sources.llm_model = ValueSource::Env;
    }
    if let Ok(secs) = std::env::var("DERBY_LLM_TIMEOUT_SECS")
        && !secs.is_empty()
    {
        cfg.llm_timeout_secs = secs
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid llm_timeout_secs".into()))?;
        sources.llm_timeout_secs = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    games: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    strategy_a: Option<String>,
    #[serde(default)]
    strategy_b: Option<String>,
    #[serde(default)]
    hint_a: Option<String>,
    #[serde(default)]
    hint_b: Option<String>,
    #[serde(default)]
    llm_endpoint: Option<String>,
    #[serde(default)]
    llm_model: Option<String>,
    #[serde(default)]
    llm_timeout_secs: Option<u64>,
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.games == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: games must be >=1".into(),
        ));
    }
    for s in [&cfg.strategy_a, &cfg.strategy_b] {
        s.parse::<StrategyKind>()
            .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))?;
    }
    if cfg.llm_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: llm_timeout_secs must be >0".into(),
        ));
    }
    Ok(())
}
