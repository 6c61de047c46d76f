//! Single-bet wager resolution.
//!
//! After every game move that does not end the game, the player who moved is
//! offered `{check, raise}`. A raise puts one unit in the pot and hands the
//! opponent `{call, fold}`. A call adds a second unit; a fold hands the game
//! to the raiser.
//!
//! A decision source that errors or answers outside the offered set ends the
//! round as [`Resolution::InvalidDecision`]: no further pot change and no
//! winner override. The failure is logged, never propagated.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::decision::{DecisionError, DecisionSource, LegalOptions, WagerDecision};
use crate::env::{opponent, Environment, GameOutcome, PlayerId};
use crate::errors::StepError;
use crate::logger::{RoundLogger, RoundRecord};

/// Position of a round in the betting protocol. No state is ever revisited.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum RoundState {
    AwaitingActiveDecision,
    AwaitingOpponentDecision,
    Resolved,
}

/// How a round ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Checked,
    Called,
    Folded,
    InvalidDecision,
}

/// One decision request and its answer.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub player: PlayerId,
    pub legal: LegalOptions,
    /// `None` when the source failed to answer
    pub decision: Option<WagerDecision>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Betting state for the move that was just played.
///
/// # Examples
///
/// ```
/// use derby_engine::decision::{LegalOptions, WagerDecision};
/// use derby_engine::wager::{Resolution, WagerRound};
///
/// let mut round = WagerRound::new(0);
/// assert_eq!(round.pending_request(), Some((0, LegalOptions::CheckRaise)));
/// round.apply(WagerDecision::Raise).unwrap();
/// assert_eq!(round.pending_request(), Some((1, LegalOptions::CallFold)));
/// round.apply(WagerDecision::Call).unwrap();
/// assert_eq!(round.pot(), 2);
/// assert_eq!(round.resolution(), Some(Resolution::Called));
/// assert_eq!(round.pending_request(), None);
/// ```
#[derive(Debug, Clone)]
pub struct WagerRound {
    active: PlayerId,
    non_active: PlayerId,
    pot: u32,
    resolved: bool,
    state: RoundState,
    resolution: Option<Resolution>,
    decisions: Vec<DecisionRecord>,
}

impl WagerRound {
    pub fn new(active: PlayerId) -> Self {
        Self {
            active,
            non_active: opponent(active),
            pot: 0,
            resolved: false,
            state: RoundState::AwaitingActiveDecision,
            resolution: None,
            decisions: Vec::with_capacity(2),
        }
    }

    pub fn active(&self) -> PlayerId {
        self.active
    }
    pub fn non_active(&self) -> PlayerId {
        self.non_active
    }
    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }
    pub fn state(&self) -> RoundState {
        self.state
    }
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }
    pub fn decisions(&self) -> &[DecisionRecord] {
        &self.decisions
    }

    /// Who must decide next and from which set, or `None` once resolved.
    pub fn pending_request(&self) -> Option<(PlayerId, LegalOptions)> {
        match self.state {
            RoundState::AwaitingActiveDecision => Some((self.active, LegalOptions::CheckRaise)),
            RoundState::AwaitingOpponentDecision => {
                Some((self.non_active, LegalOptions::CallFold))
            }
            RoundState::Resolved => None,
        }
    }

    pub fn record(
        &mut self,
        player: PlayerId,
        legal: LegalOptions,
        result: &Result<WagerDecision, DecisionError>,
    ) {
        let (decision, error) = match result {
            Ok(d) => (Some(*d), None),
            Err(e) => (None, Some(e.to_string())),
        };
        self.decisions.push(DecisionRecord {
            player,
            legal,
            decision,
            error,
        });
    }

    /// Advance with a decision; anything not legal in the current state invalidates the round.
    pub fn apply(&mut self, decision: WagerDecision) -> Result<(), StepError> {
        match (self.state, decision) {
            (RoundState::AwaitingActiveDecision, WagerDecision::Check) => self.check(),
            (RoundState::AwaitingActiveDecision, WagerDecision::Raise) => self.raise(),
            (RoundState::AwaitingOpponentDecision, WagerDecision::Call) => self.call(),
            (RoundState::AwaitingOpponentDecision, WagerDecision::Fold) => self.fold(),
            _ => self.invalidate(),
        }
    }

    pub fn check(&mut self) -> Result<(), StepError> {
        self.expect_state(RoundState::AwaitingActiveDecision, "check")?;
        self.resolve(Resolution::Checked);
        Ok(())
    }

    pub fn raise(&mut self) -> Result<(), StepError> {
        self.expect_state(RoundState::AwaitingActiveDecision, "raise")?;
        self.pot += 1;
        self.state = RoundState::AwaitingOpponentDecision;
        Ok(())
    }

    pub fn call(&mut self) -> Result<(), StepError> {
        self.expect_state(RoundState::AwaitingOpponentDecision, "call")?;
        self.pot += 1;
        self.resolve(Resolution::Called);
        Ok(())
    }

    pub fn fold(&mut self) -> Result<(), StepError> {
        self.expect_state(RoundState::AwaitingOpponentDecision, "fold")?;
        self.resolve(Resolution::Folded);
        Ok(())
    }

    /// End the round with neutral effect.
    pub fn invalidate(&mut self) -> Result<(), StepError> {
        if self.state == RoundState::Resolved {
            return Err(StepError::UnexpectedState {
                state: self.state,
                transition: "invalidate",
            });
        }
        self.resolve(Resolution::InvalidDecision);
        Ok(())
    }

    fn expect_state(
        &self,
        expected: RoundState,
        transition: &'static str,
    ) -> Result<(), StepError> {
        if self.state != expected {
            return Err(StepError::UnexpectedState {
                state: self.state,
                transition,
            });
        }
        Ok(())
    }

    fn resolve(&mut self, resolution: Resolution) {
        self.state = RoundState::Resolved;
        self.resolution = Some(resolution);
        self.resolved = true;
    }
}

/// Pipeline stage that runs a wager round after each non-terminal game move.
pub struct WagerStage<E> {
    inner: E,
    /// Decision source per seat, indexed by player id
    sources: [Box<dyn DecisionSource>; 2],
    game_id: u32,
    turn: u32,
    last_round: Option<WagerRound>,
    history: Vec<RoundRecord>,
    logger: Option<RoundLogger>,
}

impl<E: Environment> WagerStage<E> {
    pub fn new(inner: E, sources: [Box<dyn DecisionSource>; 2]) -> Self {
        Self {
            inner,
            sources,
            game_id: 0,
            turn: 0,
            last_round: None,
            history: Vec::new(),
            logger: None,
        }
    }

    /// Stream every resolved round to `logger`.
    pub fn with_logger(mut self, logger: RoundLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }
    pub fn last_round(&self) -> Option<&WagerRound> {
        self.last_round.as_ref()
    }
    /// Rounds resolved since the last reset.
    pub fn rounds(&self) -> &[RoundRecord] {
        &self.history
    }
    pub fn game_id(&self) -> u32 {
        self.game_id
    }

    pub fn total_pot(&self) -> u32 {
        self.history.iter().map(|r| r.pot).sum()
    }

    /// Apply `action` through the wrapped environment, then resolve the wager round.
    pub fn resolve_step(&mut self, action: &str) -> Result<GameOutcome, StepError> {
        let (active, observation) = self.inner.observation();
        if active > 1 {
            return Err(StepError::InvalidPlayer(active));
        }

        let outcome = self.inner.step(action)?;
        self.turn += 1;
        if outcome.done {
            return Ok(outcome);
        }

        let mut round = WagerRound::new(active);
        while let Some((player, legal)) = round.pending_request() {
            let source = &mut self.sources[player];
            let result = source.request_decision(&observation, legal);
            round.record(player, legal, &result);
            match result {
                Ok(decision) if legal.contains(decision) => {
                    debug!(player, source = source.name(), %decision, %legal, "wager decision");
                    round.apply(decision)?;
                }
                Ok(decision) => {
                    warn!(player, source = source.name(), %decision, %legal, "decision outside legal options; resolving round");
                    round.invalidate()?;
                }
                Err(e) => {
                    warn!(player, source = source.name(), error = %e, "invalid decision; resolving round");
                    round.invalidate()?;
                }
            }
        }

        if round.resolution() == Some(Resolution::Folded) {
            self.inner.set_winners(
                vec![active],
                format!("Player {} wins by opponent folding.", active),
            );
        }
        info!(
            game = self.game_id,
            turn = self.turn,
            active,
            pot = round.pot(),
            resolution = ?round.resolution(),
            "wager round resolved"
        );

        // the round is recorded before the sink sees it, so a failed write
        // still leaves history and outcome in agreement
        self.history.push(RoundRecord::from_round(
            self.game_id,
            self.turn,
            action,
            &round,
        ));
        self.last_round = Some(round);
        if let (Some(logger), Some(record)) = (&mut self.logger, self.history.last()) {
            logger.write(record)?;
        }

        Ok(self.inner.outcome())
    }
}

impl<E: Environment> Environment for WagerStage<E> {
    fn reset(&mut self) {
        self.inner.reset();
        self.game_id += 1;
        self.turn = 0;
        self.last_round = None;
        self.history.clear();
    }

    fn step(&mut self, action: &str) -> Result<GameOutcome, StepError> {
        self.resolve_step(action)
    }

    fn observation(&self) -> (PlayerId, String) {
        self.inner.observation()
    }

    fn outcome(&self) -> GameOutcome {
        self.inner.outcome()
    }

    fn set_winners(&mut self, players: Vec<PlayerId>, reason: String) {
        self.inner.set_winners(players, reason);
    }

    fn legal_actions(&self) -> Vec<String> {
        self.inner.legal_actions()
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for WagerStage<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("WagerStage")
            .field("inner", &self.inner)
            .field("sources", &names)
            .field("game_id", &self.game_id)
            .field("turn", &self.turn)
            .finish()
    }
}
