//! Error types for the CLI application.
//!
//! Library errors from the engine and agent crates are folded into
//! [`CliError`] so command handlers can use `?` throughout.

use std::fmt;

use derby_ai::generator::GenerationError;
use derby_engine::errors::StepError;

use crate::config::ConfigError;

/// Custom error type for CLI operations.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Engine-related error
    Engine(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

// Step errors other than I/O mean the game loop fed the engine something wrong
impl From<StepError> for CliError {
    fn from(error: StepError) -> Self {
        match error {
            StepError::Io(e) => CliError::Io(e),
            other => CliError::Engine(other.to_string()),
        }
    }
}

impl From<GenerationError> for CliError {
    fn from(error: GenerationError) -> Self {
        CliError::Config(format!("cannot build text generator: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use derby_engine::errors::GameError;

    #[test]
    fn step_errors_map_by_kind() {
        let io = StepError::Io(std::io::Error::other("disk full"));
        assert!(matches!(CliError::from(io), CliError::Io(_)));

        let game = StepError::Game(GameError::ColumnFull { column: 3 });
        let mapped = CliError::from(game);
        assert!(matches!(mapped, CliError::Engine(_)));
        assert!(mapped.to_string().starts_with("Engine error:"));
    }
}
