//! Play command handler.
//!
//! Runs a session of Connect Four games in which every move is followed by a
//! wager round. Boards, per-game summaries and the session summary go to
//! `out`; agent failures are reported on `err`.

use crate::config::{self, Config};
use crate::error::CliError;
use crate::ui;
use derby_ai::agent::MoveAgent;
use derby_ai::{AgentSettings, StrategyKind, create_mover, create_strategy};
use derby_engine::connect_four::ConnectFour;
use derby_engine::env::{Environment, GameOutcome};
use derby_engine::logger::{RoundLogger, RoundRecord};
use derby_engine::stages::build_pipeline;
use derby_engine::wager::Resolution;
use std::io::Write;
use tracing::warn;

/// Seat names used for rendering and agent identities.
pub const SEAT_NAMES: [&str; 2] = ["Player 0", "Player 1"];

/// Flags given to `derby play`. Every `None` falls back to configuration.
#[derive(Debug, Clone, Default)]
pub struct PlayArgs {
    pub games: Option<u32>,
    pub seed: Option<u64>,
    pub strategy_a: Option<String>,
    pub strategy_b: Option<String>,
    pub output: Option<String>,
    pub quiet: bool,
}

#[derive(Debug, Default)]
struct SessionTally {
    games: u32,
    wins: [u32; 2],
    draws: u32,
    fold_endings: u32,
    invalid_rounds: u32,
    total_pot: u32,
}

/// Handle the play command.
///
/// # Errors
///
/// - `CliError::Config` when configuration or flags are invalid, or an `llm`
///   seat cannot build its HTTP client
/// - `CliError::Io` when the output file or streams cannot be written
/// - `CliError::Engine` when the game rejects a move
pub fn handle_play_command(
    args: PlayArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = resolve_config(&args)?;

    let seed = cfg.seed.unwrap_or_else(rand::random);
    let settings = seat_settings(&cfg, seed)?;
    let strategies = [create_strategy(&settings[0])?, create_strategy(&settings[1])?];
    let mut movers = [create_mover(&settings[0])?, create_mover(&settings[1])?];

    let logger = match &args.output {
        Some(path) => Some(RoundLogger::create(path)?),
        None => None,
    };

    writeln!(
        out,
        "Seed: {} | {} ({}) vs {} ({})",
        seed, SEAT_NAMES[0], settings[0].kind, SEAT_NAMES[1], settings[1].kind
    )?;

    let mut env = build_pipeline(
        ConnectFour::new(),
        strategies,
        SEAT_NAMES.map(String::from),
        logger,
        out,
    )
    .show_moves(!args.quiet);

    let mut tally = SessionTally::default();
    for game in 1..=cfg.games {
        env.reset();
        let outcome = play_game(&mut env, &mut movers, err)?;
        let rounds = env.inner().rounds();
        let line = summarize_game(game, &outcome, rounds, &mut tally);
        writeln!(env.writer(), "{}", line)?;
    }

    writeln!(
        env.writer(),
        "Session: games={} {}={} {}={} draws={} fold_endings={} invalid_rounds={} total_pot={}",
        tally.games,
        SEAT_NAMES[0],
        tally.wins[0],
        SEAT_NAMES[1],
        tally.wins[1],
        tally.draws,
        tally.fold_endings,
        tally.invalid_rounds,
        tally.total_pot
    )?;
    Ok(())
}

fn resolve_config(args: &PlayArgs) -> Result<Config, CliError> {
    let mut cfg = config::load_with_sources()?.config;
    if let Some(games) = args.games {
        cfg.games = games;
    }
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(s) = &args.strategy_a {
        cfg.strategy_a = s.clone();
    }
    if let Some(s) = &args.strategy_b {
        cfg.strategy_b = s.clone();
    }
    config::validate(&cfg)?;
    Ok(cfg)
}

/// Per-seat agent settings; seat `n` draws from `seed + n`.
fn seat_settings(cfg: &Config, seed: u64) -> Result<[AgentSettings; 2], CliError> {
    let seats = [
        (&cfg.strategy_a, &cfg.hint_a),
        (&cfg.strategy_b, &cfg.hint_b),
    ];
    let mut built = Vec::with_capacity(2);
    for (seat, (strategy, hint)) in seats.into_iter().enumerate() {
        let kind: StrategyKind = strategy.parse().map_err(CliError::Config)?;
        let mut s = AgentSettings::new(SEAT_NAMES[seat], kind).with_seed(seed.wrapping_add(seat as u64));
        if let Some(hint) = hint {
            s = s.with_hint(hint.clone());
        }
        s.llm = cfg.llm();
        built.push(s);
    }
    built
        .try_into()
        .map_err(|_| CliError::Engine("expected two seats".into()))
}

/// Drive one game to completion.
///
/// A mover that fails is replaced for that turn by the first legal move.
fn play_game<E: Environment>(
    env: &mut E,
    movers: &mut [Box<dyn MoveAgent>; 2],
    err: &mut dyn Write,
) -> Result<GameOutcome, CliError> {
    loop {
        let (player, observation) = env.observation();
        let legal = env.legal_actions();
        let mover = &mut movers[player];
        let mv = match mover.choose_move(&observation, &legal) {
            Ok(mv) => mv,
            Err(e) => {
                warn!(player, agent = mover.name(), error = %e, "move agent failed; playing first legal move");
                ui::display_warning(
                    err,
                    &format!("{} could not choose a move ({}); playing first legal move", mover.name(), e),
                )?;
                legal
                    .first()
                    .cloned()
                    .ok_or_else(|| CliError::Engine("no legal moves in unfinished game".into()))?
            }
        };
        let outcome = env.step(&mv)?;
        if outcome.done {
            return Ok(outcome);
        }
    }
}

fn summarize_game(
    game: u32,
    outcome: &GameOutcome,
    rounds: &[RoundRecord],
    tally: &mut SessionTally,
) -> String {
    let pot: u32 = rounds.iter().map(|r| r.pot).sum();
    let folds = rounds
        .iter()
        .filter(|r| r.resolution == Resolution::Folded)
        .count();
    let invalid = rounds
        .iter()
        .filter(|r| r.resolution == Resolution::InvalidDecision)
        .count() as u32;

    tally.games += 1;
    tally.total_pot += pot;
    tally.invalid_rounds += invalid;
    if folds > 0 {
        tally.fold_endings += 1;
    }

    let (result, reason) = match &outcome.winners {
        Some(w) if w.players.is_empty() => {
            tally.draws += 1;
            ("draw".to_string(), w.reason.as_str())
        }
        Some(w) => {
            for p in &w.players {
                if let Some(n) = tally.wins.get_mut(*p) {
                    *n += 1;
                }
            }
            let names: Vec<&str> = w
                .players
                .iter()
                .map(|p| SEAT_NAMES.get(*p).copied().unwrap_or("unknown"))
                .collect();
            (format!("{} won", names.join(", ")), w.reason.as_str())
        }
        None => ("no result".to_string(), ""),
    };

    format!(
        "Game {}: {} ({}) | rounds={} pot={} folds={} invalid={}",
        game,
        result,
        reason,
        rounds.len(),
        pot,
        folds,
        invalid
    )
}
