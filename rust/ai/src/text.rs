//! Agents backed by free-text generation.
//!
//! The generator is asked to answer with a bracketed token (`[raise]`,
//! `[3]`); the first such token in the reply is taken as the answer.

use derby_engine::decision::{DecisionError, DecisionSource, LegalOptions, WagerDecision};
use tracing::debug;

use crate::agent::{AgentError, MoveAgent};
use crate::generator::TextGenerator;
use crate::identity::AgentIdentity;

/// Text inside the first `[...]` pair that does not span a line break.
///
/// ```rust
/// use derby_ai::text::first_bracketed;
///
/// assert_eq!(first_bracketed("I will [raise] now"), Some("raise"));
/// assert_eq!(first_bracketed("[a\n] then [b]"), Some("b"));
/// assert_eq!(first_bracketed("nothing"), None);
/// ```
pub fn first_bracketed(text: &str) -> Option<&str> {
    let mut rest = text;
    let mut offset = 0;
    while let Some(open) = rest.find('[') {
        let start = offset + open + 1;
        let tail = &text[start..];
        let line_end = tail.find('\n').unwrap_or(tail.len());
        if let Some(close) = tail[..line_end].find(']') {
            return Some(&tail[..close]);
        }
        offset = start;
        rest = &text[offset..];
    }
    None
}

/// Extract a wager decision from free text.
///
/// # Errors
///
/// - [`DecisionError::MissingMarker`] when the text has no bracketed token
/// - [`DecisionError::UnknownDecision`] when the token is not a decision name
/// - [`DecisionError::IllegalOption`] when the decision is not in `legal`
///
/// # Examples
///
/// ```rust
/// use derby_ai::text::parse_wager_response;
/// use derby_engine::decision::{LegalOptions, WagerDecision};
///
/// assert_eq!(
///     parse_wager_response("I will [raise] this time", LegalOptions::CheckRaise),
///     Ok(WagerDecision::Raise)
/// );
/// assert!(parse_wager_response("no brackets here", LegalOptions::CheckRaise).is_err());
/// assert!(parse_wager_response("[dance]", LegalOptions::CallFold).is_err());
/// ```
pub fn parse_wager_response(
    response: &str,
    legal: LegalOptions,
) -> Result<WagerDecision, DecisionError> {
    let token = first_bracketed(response).ok_or_else(|| DecisionError::MissingMarker {
        response: response.to_string(),
    })?;
    let decision: WagerDecision = token.parse()?;
    if !legal.contains(decision) {
        return Err(DecisionError::IllegalOption { decision, legal });
    }
    Ok(decision)
}

/// Prompt shown to a text agent during the betting round.
pub fn construct_wager_prompt(observation: &str, legal: LegalOptions, hint: Option<&str>) -> String {
    let mut prompt = format!(
        "Observation: {observation}\n\n\
         You are currently in the betting round.\n\
         The valid options are:\n{legal}\n\n\
         You must respond with the name of the option you choose in square brackets, \
         e.g. '[raise]', '[call]', '[check]', '[fold]'. Your choice must be one of the \
         valid options. You must only choose a single option.\n"
    );
    if let Some(hint) = hint.filter(|h| !h.trim().is_empty()) {
        prompt.push_str("YOUR PREFERRED STRATEGY:\n\n");
        prompt.push_str(hint);
    }
    prompt
}

/// Wager decisions read from a text generator's reply.
///
/// Fails with [`DecisionError`] rather than guessing when the reply cannot be
/// mapped onto the offered options.
pub struct TextStrategy<G> {
    identity: AgentIdentity,
    generator: G,
    hint: Option<String>,
}

impl<G: TextGenerator> TextStrategy<G> {
    pub fn new(identity: AgentIdentity, generator: G, hint: Option<String>) -> Self {
        Self {
            identity,
            generator,
            hint,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }
}

impl<G: TextGenerator> DecisionSource for TextStrategy<G> {
    fn request_decision(
        &mut self,
        context: &str,
        legal: LegalOptions,
    ) -> Result<WagerDecision, DecisionError> {
        let prompt = construct_wager_prompt(context, legal, self.hint.as_deref());
        debug!(agent = %self.identity, %prompt, "wager prompt");
        let response = self
            .generator
            .generate(&prompt)
            .map_err(|e| DecisionError::Generation(e.to_string()))?;
        debug!(agent = %self.identity, %response, "wager response");
        parse_wager_response(&response, legal)
    }

    fn name(&self) -> &str {
        self.identity.name()
    }
}

/// Game moves read from a text generator's reply.
pub struct TextMover<G> {
    identity: AgentIdentity,
    generator: G,
    hint: Option<String>,
}

impl<G: TextGenerator> TextMover<G> {
    pub fn new(identity: AgentIdentity, generator: G, hint: Option<String>) -> Self {
        Self {
            identity,
            generator,
            hint,
        }
    }

    fn prompt(&self, observation: &str) -> String {
        let mut prompt = format!(
            "{observation}\nRespond with exactly one valid move in square brackets, e.g. '[3]'.\n"
        );
        if let Some(hint) = self.hint.as_deref().filter(|h| !h.trim().is_empty()) {
            prompt.push_str("YOUR PREFERRED STRATEGY:\n\n");
            prompt.push_str(hint);
        }
        prompt
    }
}

impl<G: TextGenerator> MoveAgent for TextMover<G> {
    fn choose_move(&mut self, observation: &str, legal: &[String]) -> Result<String, AgentError> {
        if legal.is_empty() {
            return Err(AgentError::NoLegalMoves);
        }
        let response = self.generator.generate(&self.prompt(observation))?;
        debug!(agent = %self.identity, %response, "move response");
        let token = first_bracketed(&response).ok_or_else(|| AgentError::MissingMarker {
            response: response.clone(),
        })?;
        let mv = format!("[{}]", token.trim());
        if !legal.contains(&mv) {
            return Err(AgentError::IllegalMove(mv));
        }
        Ok(mv)
    }

    fn name(&self) -> &str {
        self.identity.name()
    }
}
