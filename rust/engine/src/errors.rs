use thiserror::Error;

use crate::wager::RoundState;

/// Illegal moves reported by the reference game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Column {column} out of range (board has {columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },
    #[error("Column {column} is full")]
    ColumnFull { column: usize },
    #[error("Could not read a move from '{0}'")]
    UnparseableMove(String),
    #[error("Game already over")]
    GameOver,
}

/// Errors surfaced by [`crate::env::Environment::step`] on any stage of the pipeline.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Cannot {transition} a wager round in state {state:?}")]
    UnexpectedState {
        state: RoundState,
        transition: &'static str,
    },
    #[error("Player id {0} is not a seat at a two-player table")]
    InvalidPlayer(usize),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
