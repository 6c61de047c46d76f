//! Command-line argument definitions for the `derby` binary.

use clap::{Parser, Subcommand, ValueEnum};
use derby_engine::decision::LegalOptions;

#[derive(Parser, Debug)]
#[command(
    name = "derby",
    version,
    about = "Derby: Connect Four with a betting round after every move"
)]
pub struct DerbyCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play wagered Connect Four games between two agents
    Play {
        /// Number of games (defaults to configuration)
        #[arg(long)]
        games: Option<u32>,
        /// Base seed for random agents
        #[arg(long)]
        seed: Option<u64>,
        /// Agent for Player 0: random or llm
        #[arg(long)]
        strategy_a: Option<String>,
        /// Agent for Player 1: random or llm
        #[arg(long)]
        strategy_b: Option<String>,
        /// Write one JSON line per wager round to this file
        #[arg(long)]
        output: Option<String>,
        /// Only print results and summaries, not every move
        #[arg(long)]
        quiet: bool,
    },
    /// Aggregate statistics from a round-record JSONL file
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Parse a free-text reply into a wager decision
    Parse {
        #[arg(long, value_enum)]
        legal: LegalArg,
        text: String,
    },
    /// Show resolved configuration with value sources
    Cfg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LegalArg {
    CheckRaise,
    CallFold,
}

impl From<LegalArg> for LegalOptions {
    fn from(arg: LegalArg) -> Self {
        match arg {
            LegalArg::CheckRaise => LegalOptions::CheckRaise,
            LegalArg::CallFold => LegalOptions::CallFold,
        }
    }
}
