//! Configuration command handler.
//!
//! Prints every configuration value with the layer it came from
//! (`default`, `file` or `env`) as pretty JSON.
//!
//! # Example Output
//!
//! ```json
//! {
//!   "games": {
//!     "value": 1,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()
        .map_err(|e| CliError::Config(format!("Invalid configuration: {}", e)))?;

    let display = serde_json::json!({
        "games": { "value": config.games, "source": sources.games },
        "seed": { "value": config.seed, "source": sources.seed },
        "strategy_a": { "value": config.strategy_a, "source": sources.strategy_a },
        "strategy_b": { "value": config.strategy_b, "source": sources.strategy_b },
        "hint_a": { "value": config.hint_a, "source": sources.hint_a },
        "hint_b": { "value": config.hint_b, "source": sources.hint_b },
        "llm_endpoint": { "value": config.llm_endpoint, "source": sources.llm_endpoint },
        "llm_model": { "value": config.llm_model, "source": sources.llm_model },
        "llm_timeout_secs": { "value": config.llm_timeout_secs, "source": sources.llm_timeout_secs },
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
