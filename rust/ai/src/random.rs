//! Uniform-random agents.
//!
//! Both agents draw from a ChaCha20 stream so a seeded session replays
//! exactly.

use derby_engine::decision::{DecisionError, DecisionSource, LegalOptions, WagerDecision};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::agent::{AgentError, MoveAgent};
use crate::identity::AgentIdentity;

/// Wager decisions chosen uniformly from the offered options. Never fails.
///
/// # Example
///
/// ```rust
/// use derby_ai::identity::AgentIdentity;
/// use derby_ai::random::RandomStrategy;
/// use derby_engine::decision::{DecisionSource, LegalOptions};
///
/// let mut s = RandomStrategy::new(AgentIdentity::new("p0"), Some(7));
/// let d = s.request_decision("board", LegalOptions::CheckRaise).unwrap();
/// assert!(LegalOptions::CheckRaise.contains(d));
/// ```
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    identity: AgentIdentity,
    rng: ChaCha20Rng,
}

impl RandomStrategy {
    pub fn new(identity: AgentIdentity, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            identity,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl DecisionSource for RandomStrategy {
    fn request_decision(
        &mut self,
        _context: &str,
        legal: LegalOptions,
    ) -> Result<WagerDecision, DecisionError> {
        let options = legal.options();
        Ok(options[self.rng.random_range(0..options.len())])
    }

    fn name(&self) -> &str {
        self.identity.name()
    }
}

/// Game moves chosen uniformly from the legal list.
#[derive(Debug, Clone)]
pub struct RandomMover {
    identity: AgentIdentity,
    rng: ChaCha20Rng,
}

impl RandomMover {
    pub fn new(identity: AgentIdentity, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            identity,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl MoveAgent for RandomMover {
    fn choose_move(&mut self, _observation: &str, legal: &[String]) -> Result<String, AgentError> {
        if legal.is_empty() {
            return Err(AgentError::NoLegalMoves);
        }
        Ok(legal[self.rng.random_range(0..legal.len())].clone())
    }

    fn name(&self) -> &str {
        self.identity.name()
    }
}
