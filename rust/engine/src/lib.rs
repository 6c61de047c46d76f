//! # derby-engine: Single-Bet Wagering Core
//!
//! Appends one betting exchange to every move of a turn-based two-player
//! game. After a move, the player who moved may check or raise; a raise lets
//! the opponent call or fold, and a fold hands the game to the raiser.
//!
//! ## Core Modules
//!
//! - [`decision`] - Wager decisions, legal option sets and the [`decision::DecisionSource`] trait
//! - [`wager`] - Round state machine and the wagering pipeline stage
//! - [`env`] - Move/observation contract shared by the game and all stages
//! - [`stages`] - Observation and render stages, pipeline assembly
//! - [`connect_four`] - Reference game used by the CLI
//! - [`logger`] - Round records and JSONL round logging
//! - [`errors`] - Error types for game and step operations
//!
//! ## Quick Start
//!
//! ```rust
//! use derby_engine::connect_four::ConnectFour;
//! use derby_engine::decision::{DecisionError, DecisionSource, LegalOptions, WagerDecision};
//! use derby_engine::env::Environment;
//! use derby_engine::wager::{Resolution, WagerStage};
//!
//! // Raises every time it may, folds when facing a raise
//! struct Bully;
//! impl DecisionSource for Bully {
//!     fn request_decision(
//!         &mut self,
//!         _context: &str,
//!         legal: LegalOptions,
//!     ) -> Result<WagerDecision, DecisionError> {
//!         Ok(match legal {
//!             LegalOptions::CheckRaise => WagerDecision::Raise,
//!             LegalOptions::CallFold => WagerDecision::Fold,
//!         })
//!     }
//!     fn name(&self) -> &str {
//!         "Bully"
//!     }
//! }
//!
//! let mut stage = WagerStage::new(ConnectFour::new(), [Box::new(Bully), Box::new(Bully)]);
//! let outcome = stage.resolve_step("[3]").unwrap();
//!
//! // Player 1 folded to player 0's raise
//! assert!(outcome.done);
//! assert_eq!(outcome.winners.unwrap().players, vec![0]);
//! assert_eq!(stage.last_round().unwrap().resolution(), Some(Resolution::Folded));
//! ```

pub mod connect_four;
pub mod decision;
pub mod env;
pub mod errors;
pub mod logger;
pub mod stages;
pub mod wager;
