//! Command handlers for the `derby` CLI.
//!
//! Each handler takes its parsed arguments plus the output streams and
//! returns `Result<(), CliError>`; [`crate::run`] maps the result to an exit
//! code.

mod cfg;
mod parse;
mod play;
mod stats;

pub use cfg::handle_cfg_command;
pub use parse::handle_parse_command;
pub use play::{PlayArgs, handle_play_command};
pub use stats::handle_stats_command;
