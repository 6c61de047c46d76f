//! Statistics aggregation over round-record JSONL files.
//!
//! Counts resolutions, pot and fold wins, and checks that every record's pot
//! agrees with how its round resolved.

use crate::error::CliError;
use crate::ui;
use derby_engine::decision::WagerDecision;
use derby_engine::logger::RoundRecord;
use derby_engine::wager::Resolution;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Default)]
struct StatsState {
    rounds: u64,
    games: HashSet<(usize, u32)>,
    checked: u64,
    called: u64,
    folded: u64,
    invalid: u64,
    total_pot: u64,
    fold_wins: [u64; 2],
    raises: [u64; 2],
    skipped: u64,
    corrupted: u64,
    files: usize,
    stats_ok: bool,
}

/// Aggregates statistics from round-record JSONL files.
///
/// `input` may be a single file or a directory searched recursively for
/// `*.jsonl` files. Unparseable lines are counted as corrupted; an
/// unparseable final line without a trailing newline is counted as skipped
/// (a write cut short).
///
/// # Errors
///
/// Returns `CliError::InvalidInput` when a record's pot is inconsistent with
/// its resolution, or when a single file contains nothing but bad lines.
pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(&input);
    let mut state = StatsState {
        stats_ok: true,
        ..StatsState::default()
    };

    if path.is_dir() {
        let mut stack = vec![path.to_path_buf()];
        while let Some(d) = stack.pop() {
            let rd = match std::fs::read_dir(&d) {
                Ok(v) => v,
                Err(_) => continue,
            };
            for e in rd.filter_map(Result::ok) {
                let p = e.path();
                if p.is_dir() {
                    stack.push(p);
                } else if p.extension().is_some_and(|ext| ext == "jsonl") {
                    match std::fs::read_to_string(&p) {
                        Ok(content) => consume_content(&content, &mut state, err)?,
                        Err(_) => state.corrupted += 1,
                    }
                }
            }
        }
    } else {
        match std::fs::read_to_string(path) {
            Ok(s) => consume_content(&s, &mut state, err)?,
            Err(e) => {
                return Err(CliError::InvalidInput(format!(
                    "Failed to read {}: {}",
                    input, e
                )));
            }
        }
    }

    if state.corrupted > 0 {
        ui::display_warning(
            err,
            &format!("Skipped {} corrupted record(s)", state.corrupted),
        )?;
    }
    if state.skipped > 0 {
        ui::display_warning(
            err,
            &format!("Discarded {} incomplete final line(s)", state.skipped),
        )?;
    }
    if !path.is_dir() && state.rounds == 0 && (state.corrupted > 0 || state.skipped > 0) {
        return Err(CliError::InvalidInput("Invalid record".to_string()));
    }

    let summary = serde_json::json!({
        "rounds": state.rounds,
        "games": state.games.len(),
        "resolutions": {
            "checked": state.checked,
            "called": state.called,
            "folded": state.folded,
            "invalid_decision": state.invalid,
        },
        "total_pot": state.total_pot,
        "fold_wins": { "p0": state.fold_wins[0], "p1": state.fold_wins[1] },
        "raises": { "p0": state.raises[0], "p1": state.raises[1] },
    });
    let json_output = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize stats: {}", e)))?;
    writeln!(out, "{}", json_output)?;
    if state.stats_ok {
        Ok(())
    } else {
        Err(CliError::InvalidInput(
            "Statistics validation failed".to_string(),
        ))
    }
}

fn consume_content(
    content: &str,
    state: &mut StatsState,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let file = state.files;
    state.files += 1;

    let has_trailing_nl = content.ends_with('\n');
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    for (i, line) in lines.iter().enumerate() {
        let rec: RoundRecord = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(_) => {
                if i == lines.len() - 1 && !has_trailing_nl {
                    state.skipped += 1;
                } else {
                    state.corrupted += 1;
                }
                continue;
            }
        };

        if !pot_matches(&rec) {
            state.stats_ok = false;
            ui::write_error(
                err,
                &format!(
                    "Pot {} inconsistent with {:?} at round {}",
                    rec.pot, rec.resolution, rec.round_id
                ),
            )?;
        }

        state.rounds += 1;
        state.games.insert((file, rec.game_id));
        state.total_pot += u64::from(rec.pot);
        match rec.resolution {
            Resolution::Checked => state.checked += 1,
            Resolution::Called => state.called += 1,
            Resolution::Folded => {
                state.folded += 1;
                if let Some(n) = rec.fold_winner.and_then(|w| state.fold_wins.get_mut(w)) {
                    *n += 1;
                }
            }
            Resolution::InvalidDecision => state.invalid += 1,
        }
        for d in &rec.decisions {
            if d.decision == Some(WagerDecision::Raise)
                && let Some(n) = state.raises.get_mut(d.player)
            {
                *n += 1;
            }
        }
    }
    Ok(())
}

/// A raise adds one unit and a call a second; nothing else touches the pot.
fn pot_matches(rec: &RoundRecord) -> bool {
    match rec.resolution {
        Resolution::Checked => rec.pot == 0,
        Resolution::Folded => rec.pot == 1 && rec.fold_winner == Some(rec.active),
        Resolution::Called => rec.pot == 2,
        Resolution::InvalidDecision => rec.pot <= 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game_id: u32, turn: u32, pot: u32, resolution: Resolution) -> String {
        let rec = RoundRecord {
            round_id: derby_engine::logger::format_round_id(game_id, turn),
            game_id,
            turn,
            action: "[3]".into(),
            active: (turn as usize + 1) % 2,
            non_active: turn as usize % 2,
            decisions: Vec::new(),
            pot,
            resolution,
            fold_winner: (resolution == Resolution::Folded).then_some((turn as usize + 1) % 2),
            ts: None,
        };
        serde_json::to_string(&rec).unwrap()
    }

    fn run(content: &str) -> (Result<(), CliError>, String, String) {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut temp, content.as_bytes()).unwrap();
        let path = temp.path().to_str().unwrap().to_string();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_stats_command(path, &mut out, &mut err);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_stats_empty_file() {
        let (result, out, _) = run("");
        assert!(result.is_ok());
        assert!(out.contains("\"rounds\": 0"));
    }

    #[test]
    fn test_stats_aggregates_rounds() {
        let content = [
            record(1, 1, 0, Resolution::Checked),
            record(1, 2, 2, Resolution::Called),
            record(1, 3, 1, Resolution::Folded),
            record(2, 1, 0, Resolution::InvalidDecision),
        ]
        .join("\n")
            + "\n";
        let (result, out, err) = run(&content);
        assert!(result.is_ok(), "{}", err);
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["rounds"], 4);
        assert_eq!(json["games"], 2);
        assert_eq!(json["total_pot"], 3);
        assert_eq!(json["resolutions"]["checked"], 1);
        assert_eq!(json["resolutions"]["called"], 1);
        assert_eq!(json["resolutions"]["folded"], 1);
        assert_eq!(json["resolutions"]["invalid_decision"], 1);
        // turn 3 is opened by player 0
        assert_eq!(json["fold_wins"]["p0"], 1);
        assert_eq!(json["fold_wins"]["p1"], 0);
    }

    #[test]
    fn test_stats_pot_mismatch() {
        let content = record(1, 1, 2, Resolution::Checked) + "\n";
        let (result, _, err) = run(&content);
        assert!(result.is_err());
        assert!(err.contains("inconsistent with Checked at round 0001-000001"));
    }

    #[test]
    fn test_stats_corrupted_and_truncated() {
        let content = format!(
            "{}\n{{invalid json}}\n{}\n{{\"round_id\":",
            record(1, 1, 0, Resolution::Checked),
            record(1, 2, 2, Resolution::Called)
        );
        let (result, out, err) = run(&content);
        assert!(result.is_ok());
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["rounds"], 2);
        assert!(err.contains("Skipped 1 corrupted record(s)"));
        assert!(err.contains("Discarded 1 incomplete final line(s)"));
    }

    #[test]
    fn test_stats_only_garbage_is_an_error() {
        let (result, _, _) = run("not json\n");
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_stats_nonexistent_file() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_stats_command(
            "/nonexistent/path/to/file.jsonl".to_string(),
            &mut out,
            &mut err,
        );
        assert!(result.is_err());
    }
}
