//! # derby-ai: Wagering Agents
//!
//! Provides decision sources for the wager round and move agents for the
//! underlying game. Every agent comes in two flavours: uniform random, and
//! backed by a text generator whose reply is parsed for a bracketed answer.
//!
//! ## Core Components
//!
//! - [`random`] - Seedable uniform-random strategy and mover
//! - [`text`] - Prompt construction, reply parsing, text-backed strategy and mover
//! - [`generator`] - [`generator::TextGenerator`] trait and the Ollama HTTP client
//! - [`agent`] - [`agent::MoveAgent`] trait for choosing game moves
//! - [`identity`] - Opaque identity/credential handed to agents
//! - [`create_strategy`] / [`create_mover`] - Factories driven by [`AgentSettings`]
//!
//! ## Quick Start
//!
//! ```rust
//! use derby_ai::{create_strategy, AgentSettings, StrategyKind};
//! use derby_engine::decision::LegalOptions;
//!
//! let settings = AgentSettings::new("Player1", StrategyKind::Random).with_seed(42);
//! let mut strategy = create_strategy(&settings).expect("random strategy");
//! let decision = strategy
//!     .request_decision("board", LegalOptions::CheckRaise)
//!     .unwrap();
//! assert!(LegalOptions::CheckRaise.contains(decision));
//! ```

use std::fmt;
use std::str::FromStr;

use derby_engine::decision::DecisionSource;

pub mod agent;
pub mod generator;
pub mod identity;
pub mod random;
pub mod text;

use agent::MoveAgent;
use generator::{GenerationError, OllamaConfig, OllamaGenerator};
use identity::AgentIdentity;
use random::{RandomMover, RandomStrategy};
use text::{TextMover, TextStrategy};

/// Which kind of agent drives a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Random,
    Llm,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Llm => "llm",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(StrategyKind::Random),
            "llm" => Ok(StrategyKind::Llm),
            other => Err(format!("Unknown strategy: {} (expected random or llm)", other)),
        }
    }
}

/// Everything needed to build the agents for one seat.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub identity: AgentIdentity,
    pub kind: StrategyKind,
    pub seed: Option<u64>,
    /// Appended verbatim to every text prompt
    pub hint: Option<String>,
    pub llm: OllamaConfig,
}

impl AgentSettings {
    pub fn new(name: impl Into<String>, kind: StrategyKind) -> Self {
        Self {
            identity: AgentIdentity::new(name),
            kind,
            seed: None,
            hint: None,
            llm: OllamaConfig::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Build the wager decision source for a seat.
///
/// # Errors
///
/// Returns [`GenerationError`] when the HTTP client for an `llm` seat cannot be built.
pub fn create_strategy(settings: &AgentSettings) -> Result<Box<dyn DecisionSource>, GenerationError> {
    Ok(match settings.kind {
        StrategyKind::Random => Box::new(RandomStrategy::new(
            settings.identity.clone(),
            settings.seed,
        )),
        StrategyKind::Llm => Box::new(TextStrategy::new(
            settings.identity.clone(),
            OllamaGenerator::new(settings.llm.clone())?,
            settings.hint.clone(),
        )),
    })
}

/// Build the move agent for a seat.
///
/// The random mover draws from a stream offset from the strategy's seed so
/// moves and wagers stay independent.
pub fn create_mover(settings: &AgentSettings) -> Result<Box<dyn MoveAgent>, GenerationError> {
    Ok(match settings.kind {
        StrategyKind::Random => Box::new(RandomMover::new(
            settings.identity.clone(),
            settings.seed.map(|s| s.wrapping_add(0x9E37_79B9)),
        )),
        StrategyKind::Llm => Box::new(TextMover::new(
            settings.identity.clone(),
            OllamaGenerator::new(settings.llm.clone())?,
            None,
        )),
    })
}
