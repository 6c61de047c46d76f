//! Wager decisions and the contract every wagering participant must satisfy.
//!
//! The state machine in [`crate::wager`] only ever offers one of two option
//! sets, so [`LegalOptions`] models exactly those two and nothing else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single betting decision.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WagerDecision {
    /// Pass without betting (active player only)
    Check,
    /// Put one unit in the pot (active player only)
    Raise,
    /// Match the raise (non-active player only)
    Call,
    /// Concede the game to the raiser (non-active player only)
    Fold,
}

impl WagerDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            WagerDecision::Check => "check",
            WagerDecision::Raise => "raise",
            WagerDecision::Call => "call",
            WagerDecision::Fold => "fold",
        }
    }
}

impl fmt::Display for WagerDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WagerDecision {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "check" => Ok(WagerDecision::Check),
            "raise" => Ok(WagerDecision::Raise),
            "call" => Ok(WagerDecision::Call),
            "fold" => Ok(WagerDecision::Fold),
            other => Err(DecisionError::UnknownDecision(other.to_string())),
        }
    }
}

/// The two option sets a decision source can be asked to choose from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalOptions {
    /// `{check, raise}`, offered to the player who just moved
    CheckRaise,
    /// `{call, fold}`, offered to the opponent after a raise
    CallFold,
}

impl LegalOptions {
    pub fn options(&self) -> &'static [WagerDecision] {
        match self {
            LegalOptions::CheckRaise => &[WagerDecision::Check, WagerDecision::Raise],
            LegalOptions::CallFold => &[WagerDecision::Call, WagerDecision::Fold],
        }
    }

    pub fn contains(&self, decision: WagerDecision) -> bool {
        self.options().contains(&decision)
    }
}

impl fmt::Display for LegalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.options().iter().map(|d| d.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Raised by a decision source that cannot produce a member of the requested set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("No decision found in square brackets in response: {response}")]
    MissingMarker { response: String },
    #[error("Unknown decision '{0}'")]
    UnknownDecision(String),
    #[error("Decision '{decision}' not in valid options: {legal}")]
    IllegalOption {
        decision: WagerDecision,
        legal: LegalOptions,
    },
    #[error("Text generation failed: {0}")]
    Generation(String),
}

/// Capability shared by every wagering participant.
///
/// A conforming implementation returns a member of `legal`, or fails with a
/// [`DecisionError`]. It never returns a value outside the set.
///
/// # Example Implementation
///
/// ```rust
/// use derby_engine::decision::{DecisionError, DecisionSource, LegalOptions, WagerDecision};
///
/// struct AlwaysFirst;
///
/// impl DecisionSource for AlwaysFirst {
///     fn request_decision(
///         &mut self,
///         _context: &str,
///         legal: LegalOptions,
///     ) -> Result<WagerDecision, DecisionError> {
///         Ok(legal.options()[0])
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysFirst"
///     }
/// }
///
/// let mut source = AlwaysFirst;
/// let d = source.request_decision("board", LegalOptions::CallFold).unwrap();
/// assert_eq!(d, WagerDecision::Call);
/// ```
pub trait DecisionSource: Send {
    /// Choose one option from `legal` given the observation text `context`.
    fn request_decision(
        &mut self,
        context: &str,
        legal: LegalOptions,
    ) -> Result<WagerDecision, DecisionError>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_is_case_and_whitespace_insensitive() {
        assert_eq!(" RAISE ".parse::<WagerDecision>(), Ok(WagerDecision::Raise));
        assert_eq!("Fold".parse::<WagerDecision>(), Ok(WagerDecision::Fold));
        assert_eq!(
            "dance".parse::<WagerDecision>(),
            Err(DecisionError::UnknownDecision("dance".into()))
        );
    }

    #[test]
    fn legal_sets_are_disjoint() {
        for d in LegalOptions::CheckRaise.options() {
            assert!(!LegalOptions::CallFold.contains(*d));
        }
        assert!(LegalOptions::CheckRaise.contains(WagerDecision::Check));
        assert!(LegalOptions::CallFold.contains(WagerDecision::Fold));
    }

    #[test]
    fn legal_options_display() {
        assert_eq!(LegalOptions::CheckRaise.to_string(), "[check, raise]");
        assert_eq!(LegalOptions::CallFold.to_string(), "[call, fold]");
    }

    #[test]
    fn decisions_serialize_lowercase() {
        let s = serde_json::to_string(&WagerDecision::Call).unwrap();
        assert_eq!(s, "\"call\"");
        let back: WagerDecision = serde_json::from_str("\"check\"").unwrap();
        assert_eq!(back, WagerDecision::Check);
    }
}
