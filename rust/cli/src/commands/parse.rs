//! Parse command handler: runs the free-text reply parser used by text agents.

use crate::error::CliError;
use derby_ai::text::parse_wager_response;
use derby_engine::decision::LegalOptions;
use std::io::Write;

/// Print the decision extracted from `text` when `legal` is on offer.
///
/// # Errors
///
/// Returns `CliError::InvalidInput` carrying the parser's reason when the text
/// holds no acceptable decision.
pub fn handle_parse_command(
    legal: LegalOptions,
    text: &str,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let decision =
        parse_wager_response(text, legal).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    writeln!(out, "{}", decision)?;
    Ok(())
}
