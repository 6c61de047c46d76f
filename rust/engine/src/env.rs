use serde::{Deserialize, Serialize};

use crate::errors::StepError;

/// Player identifier (0 or 1).
pub type PlayerId = usize;

/// The other seat at a two-player table. `player` must be 0 or 1.
pub fn opponent(player: PlayerId) -> PlayerId {
    1 - player
}

/// Winners declared for a game together with the reason shown to players.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Winners {
    pub players: Vec<PlayerId>,
    pub reason: String,
}

/// Outcome record owned by the game engine.
///
/// `done` is only ever written by the game itself; wagering reaches the
/// record through [`Environment::set_winners`].
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub done: bool,
    #[serde(default)]
    pub winners: Option<Winners>,
}

impl GameOutcome {
    pub fn in_progress() -> Self {
        Self::default()
    }

    /// Empty winner list means a draw.
    pub fn is_draw(&self) -> bool {
        self.done
            && self
                .winners
                .as_ref()
                .is_some_and(|w| w.players.is_empty())
    }
}

/// Move/observation contract shared by the game and every stage wrapped around it.
pub trait Environment {
    /// Start a fresh game.
    fn reset(&mut self);

    /// Apply `action` for the current player and report the outcome.
    fn step(&mut self, action: &str) -> Result<GameOutcome, StepError>;

    /// Current player and the observation text prepared for that player.
    ///
    /// The player id is always 0 or 1; [`crate::wager::WagerStage`] rejects
    /// anything else with [`StepError::InvalidPlayer`].
    fn observation(&self) -> (PlayerId, String);

    fn outcome(&self) -> GameOutcome;

    /// Overwrite the winners of the current game.
    fn set_winners(&mut self, players: Vec<PlayerId>, reason: String);

    /// Moves the current player may submit.
    fn legal_actions(&self) -> Vec<String>;
}
