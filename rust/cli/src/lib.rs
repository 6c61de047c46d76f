//! # Derby CLI Library
//!
//! Command-line front end for the Derby wagering engine: two agents play
//! Connect Four and bet on the position after every move.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["derby", "play", "--games", "3", "--seed", "42"];
//! let code = derby_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play wagered games between two agents, optionally recording rounds
//! - `stats`: Aggregate statistics from JSONL round records
//! - `parse`: Run the free-text decision parser on a reply
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod logging;
pub mod ui;

use cli::{Commands, DerbyCli};
use commands::{
    PlayArgs, handle_cfg_command, handle_parse_command, handle_play_command, handle_stats_command,
};

pub use error::CliError;

const COMMANDS: &[&str] = &["play", "stats", "parse", "cfg"];

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate subcommand handler.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors
///
/// # Example
///
/// ```
/// use std::io;
/// let mut out = Vec::new();
/// let args = vec!["derby", "parse", "--legal", "check-raise", "I will [check]"];
/// let code = derby_cli::run(args, &mut out, &mut io::stderr());
/// assert_eq!(code, 0);
/// assert_eq!(String::from_utf8(out).unwrap(), "check\n");
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match DerbyCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Play {
            games,
            seed,
            strategy_a,
            strategy_b,
            output,
            quiet,
        } => handle_play_command(
            PlayArgs {
                games,
                seed,
                strategy_a,
                strategy_b,
                output,
                quiet,
            },
            out,
            err,
        ),
        Commands::Stats { input } => handle_stats_command(input, out, err),
        Commands::Parse { legal, text } => handle_parse_command(legal.into(), &text, out),
        Commands::Cfg => handle_cfg_command(out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if write!(out, "{}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::SUCCESS
        }
        _ => {
            if writeln!(err, "{}", e).is_err()
                || writeln!(err).is_err()
                || writeln!(err, "Derby CLI").is_err()
                || writeln!(err, "Usage: derby <command> [options]\n").is_err()
                || writeln!(err, "Commands:").is_err()
            {
                return exit_code::ERROR;
            }
            for c in COMMANDS {
                if writeln!(err, "  {}", c).is_err() {
                    return exit_code::ERROR;
                }
            }
            let _ = writeln!(err, "\nFor full help, run: derby --help");
            exit_code::ERROR
        }
    }
}
