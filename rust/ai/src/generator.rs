//! Text generation backends used by the text-parsing agents.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generate request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generator returned an empty response")]
    Empty,
}

/// Anything that turns a prompt into free text.
pub trait TextGenerator: Send {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Minimal config for an Ollama-style `POST /api/generate` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    /// Full endpoint URL, e.g. `http://127.0.0.1:11434/api/generate`.
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:11434/api/generate".to_string(),
            model: "llama3.2".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Blocking client for an Ollama-style generate endpoint.
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: reqwest::blocking::Client,
    config: OllamaConfig,
}

impl OllamaGenerator {
    pub fn new(config: OllamaConfig) -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

impl TextGenerator for OllamaGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = OllamaRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };
        let res = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()?
            .error_for_status()?
            .json::<OllamaResponse>()?;
        debug!(model = %self.config.model, chars = res.response.len(), "generation complete");
        if res.response.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(res.response)
    }
}
