//! Pipeline stages composed around a game.
//!
//! Every stage owns the next one and exposes the same [`Environment`]
//! contract, so a session is simply
//! `RenderStage<WagerStage<ObservationStage<Game>>>`.

use std::io::Write;

use crate::decision::DecisionSource;
use crate::env::{Environment, GameOutcome, PlayerId};
use crate::errors::StepError;
use crate::logger::RoundLogger;
use crate::wager::WagerStage;

/// Appends the move history to every observation so text agents see the whole game.
#[derive(Debug, Clone)]
pub struct ObservationStage<E> {
    inner: E,
    moves: Vec<(PlayerId, String)>,
}

impl<E: Environment> ObservationStage<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            moves: Vec::new(),
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn moves(&self) -> &[(PlayerId, String)] {
        &self.moves
    }
}

impl<E: Environment> Environment for ObservationStage<E> {
    fn reset(&mut self) {
        self.inner.reset();
        self.moves.clear();
    }

    fn step(&mut self, action: &str) -> Result<GameOutcome, StepError> {
        let (player, _) = self.inner.observation();
        let outcome = self.inner.step(action)?;
        self.moves.push((player, action.trim().to_string()));
        Ok(outcome)
    }

    fn observation(&self) -> (PlayerId, String) {
        let (player, text) = self.inner.observation();
        if self.moves.is_empty() {
            return (player, text);
        }
        let mut full = text;
        full.push_str("Move history:\n");
        for (i, (p, action)) in self.moves.iter().enumerate() {
            full.push_str(&format!("  {}. Player {}: {}\n", i + 1, p, action));
        }
        (player, full)
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

/// Writes each move, the resulting observation and the final result to `out`.
///
/// With moves hidden only the result line of each game is written.
pub struct RenderStage<E, W> {
    inner: E,
    names: [String; 2],
    out: W,
    show_moves: bool,
}

impl<E: Environment, W: Write> RenderStage<E, W> {
    pub fn new(inner: E, names: [String; 2], out: W) -> Self {
        Self {
            inner,
            names,
            out,
            show_moves: true,
        }
    }

    pub fn show_moves(mut self, show: bool) -> Self {
        self.show_moves = show;
        self
    }

    /// The sink this stage renders into, for callers that interleave their own output.
    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    fn name(&self, player: PlayerId) -> &str {
        self.names
            .get(player)
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    fn render_outcome(&mut self, outcome: &GameOutcome) -> std::io::Result<()> {
        let Some(winners) = &outcome.winners else {
            return Ok(());
        };
        let names: Vec<String> = winners
            .players
            .iter()
            .map(|p| self.name(*p).to_string())
            .collect();
        if names.is_empty() {
            writeln!(self.out, "Result: draw ({})", winners.reason)
        } else {
            writeln!(self.out, "Result: {} won ({})", names.join(", "), winners.reason)
        }
    }
}

impl<E: Environment, W: Write> Environment for RenderStage<E, W> {
    fn reset(&mut self) {
        self.inner.reset();
    }

    fn step(&mut self, action: &str) -> Result<GameOutcome, StepError> {
        let (player, _) = self.inner.observation();
        let outcome = self.inner.step(action)?;
        if self.show_moves {
            let name = self.name(player).to_string();
            writeln!(self.out, "{} plays {}", name, action.trim())?;
            let (_, observation) = self.inner.observation();
            write!(self.out, "{}", observation)?;
        }
        if outcome.done {
            self.render_outcome(&outcome)?;
        }
        Ok(outcome)
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

/// Fully assembled session: render, wager, observation, game.
pub type Pipeline<G, W> = RenderStage<WagerStage<ObservationStage<G>>, W>;

/// Assemble the standard stage order around `game`.
///
/// # Examples
///
/// ```
/// use derby_engine::connect_four::ConnectFour;
/// use derby_engine::decision::{DecisionError, DecisionSource, LegalOptions, WagerDecision};
/// use derby_engine::env::Environment;
/// use derby_engine::stages::build_pipeline;
///
/// struct Checker;
/// impl DecisionSource for Checker {
///     fn request_decision(&mut self, _: &str, l: LegalOptions) -> Result<WagerDecision, DecisionError> {
///         Ok(l.options()[0])
///     }
///     fn name(&self) -> &str { "Checker" }
/// }
///
/// let mut out = Vec::new();
/// let mut env = build_pipeline(
///     ConnectFour::new(),
///     [Box::new(Checker), Box::new(Checker)],
///     ["Alice".into(), "Bob".into()],
///     None,
///     &mut out,
/// );
/// env.reset();
/// let outcome = env.step("[3]").unwrap();
/// assert!(!outcome.done);
/// assert_eq!(env.inner().last_round().unwrap().pot(), 0);
/// ```
pub fn build_pipeline<G: Environment, W: Write>(
    game: G,
    sources: [Box<dyn DecisionSource>; 2],
    names: [String; 2],
    logger: Option<RoundLogger>,
    out: W,
) -> Pipeline<G, W> {
    let mut wager = WagerStage::new(ObservationStage::new(game), sources);
    if let Some(logger) = logger {
        wager = wager.with_logger(logger);
    }
    RenderStage::new(wager, names, out)
}
