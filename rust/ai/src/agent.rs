use thiserror::Error;

use crate::generator::GenerationError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no legal moves available")]
    NoLegalMoves,
    #[error("no move found in square brackets in response: {response}")]
    MissingMarker { response: String },
    #[error("move '{0}' is not legal here")]
    IllegalMove(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Chooses game moves (as opposed to wager decisions).
pub trait MoveAgent: Send {
    /// Pick one of `legal` given the observation text.
    fn choose_move(&mut self, observation: &str, legal: &[String]) -> Result<String, AgentError>;

    fn name(&self) -> &str;
}
