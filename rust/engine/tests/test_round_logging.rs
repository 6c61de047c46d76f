use std::io::Write;

use derby_engine::connect_four::ConnectFour;
use derby_engine::decision::{DecisionError, DecisionSource, LegalOptions, WagerDecision};
use derby_engine::env::Environment;
use derby_engine::errors::StepError;
use derby_engine::logger::{format_round_id, RoundLogger, RoundRecord};
use derby_engine::stages::{build_pipeline, ObservationStage};
use derby_engine::wager::{Resolution, WagerStage};

/// Raises whenever allowed and always calls.
struct Caller;

impl DecisionSource for Caller {
    fn request_decision(
        &mut self,
        _context: &str,
        legal: LegalOptions,
    ) -> Result<WagerDecision, DecisionError> {
        Ok(match legal {
            LegalOptions::CheckRaise => WagerDecision::Raise,
            LegalOptions::CallFold => WagerDecision::Call,
        })
    }

    fn name(&self) -> &str {
        "Caller"
    }
}

/// Raises whenever it may, folds when facing a raise.
struct Bully;

impl DecisionSource for Bully {
    fn request_decision(
        &mut self,
        _context: &str,
        legal: LegalOptions,
    ) -> Result<WagerDecision, DecisionError> {
        Ok(match legal {
            LegalOptions::CheckRaise => WagerDecision::Raise,
            LegalOptions::CallFold => WagerDecision::Fold,
        })
    }

    fn name(&self) -> &str {
        "Bully"
    }
}

/// Sink whose every write fails.
struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("disk full"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::other("disk full"))
    }
}

/// Remembers the last context it saw, always checks.
struct Watcher(std::sync::Arc<std::sync::Mutex<String>>);

impl DecisionSource for Watcher {
    fn request_decision(
        &mut self,
        context: &str,
        _legal: LegalOptions,
    ) -> Result<WagerDecision, DecisionError> {
        *self.0.lock().unwrap() = context.to_string();
        Ok(WagerDecision::Check)
    }

    fn name(&self) -> &str {
        "Watcher"
    }
}

#[test]
fn round_id_format() {
    assert_eq!(format_round_id(3, 12), "0003-000012");
}

#[test]
fn pipeline_writes_jsonl_rounds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("rounds.jsonl");
    let logger = RoundLogger::create(&path).unwrap();

    let mut out = Vec::new();
    {
        let mut env = build_pipeline(
            ConnectFour::new(),
            [Box::new(Caller), Box::new(Caller)],
            ["A".into(), "B".into()],
            Some(logger),
            &mut out,
        );
        env.reset();
        for col in ["[0]", "[1]", "[0]"] {
            env.step(col).unwrap();
        }
        assert_eq!(env.inner().total_pot(), 6);
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let records: Vec<RoundRecord> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].round_id, "0001-000001");
    assert_eq!(records[1].active, 1);
    assert_eq!(records[2].action, "[0]");
    assert!(records
        .iter()
        .all(|r| r.pot == 2 && r.resolution == Resolution::Called && r.ts.is_some()));
    assert_eq!(records[0].decisions.len(), 2);
}

#[test]
fn render_stage_prints_moves_and_result() {
    let mut out = Vec::new();
    {
        let mut env = build_pipeline(
            ConnectFour::new(),
            [Box::new(Caller), Box::new(Caller)],
            ["Alice".into(), "Bob".into()],
            None,
            &mut out,
        );
        env.reset();
        for col in ["[0]", "[1]", "[0]", "[1]", "[0]", "[1]", "[0]"] {
            env.step(col).unwrap();
        }
        assert!(env.outcome().done);
    }
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Alice plays [0]"));
    assert!(text.contains("Bob plays [1]"));
    assert!(text.contains("Result: Alice won"));
}

#[test]
fn hidden_moves_still_print_result() {
    let mut env = build_pipeline(
        ConnectFour::new(),
        [Box::new(Caller), Box::new(Caller)],
        ["Alice".into(), "Bob".into()],
        None,
        Vec::new(),
    )
    .show_moves(false);
    env.reset();
    for col in ["[0]", "[1]", "[0]", "[1]", "[0]", "[1]", "[0]"] {
        env.step(col).unwrap();
    }
    let pot = env.inner().total_pot();
    writeln!(env.writer(), "pot {}", pot).unwrap();

    let text = String::from_utf8(env.writer().clone()).unwrap();
    assert!(!text.contains("plays"));
    assert!(text.starts_with("Result: Alice won"));
    // the winning move ends the game before any wager
    assert!(text.ends_with("pot 12\n"));
}

#[test]
fn observation_stage_adds_move_history() {
    let seen = std::sync::Arc::new(std::sync::Mutex::new(String::new()));
    let mut env = build_pipeline(
        ConnectFour::new(),
        [Box::new(Watcher(seen.clone())), Box::new(Watcher(seen.clone()))],
        ["A".into(), "B".into()],
        None,
        std::io::sink(),
    );
    env.reset();
    env.step("[2]").unwrap();
    env.step("[4]").unwrap();

    let context = seen.lock().unwrap().clone();
    assert!(context.contains("Move history:"));
    assert!(context.contains("1. Player 0: [2]"));

    let mut plain = ObservationStage::new(ConnectFour::new());
    assert!(!plain.observation().1.contains("Move history"));
    plain.step("[5]").unwrap();
    assert_eq!(plain.moves(), &[(0, "[5]".to_string())]);
    plain.reset();
    assert!(plain.moves().is_empty());
}

#[test]
fn failed_log_write_still_records_folded_round() {
    let mut stage = WagerStage::new(ConnectFour::new(), [Box::new(Bully), Box::new(Bully)])
        .with_logger(RoundLogger::from_writer(BrokenSink));

    let err = stage.resolve_step("[3]").unwrap_err();
    assert!(matches!(err, StepError::Io(_)));

    // the fold override and the round history agree despite the failed write
    let outcome = stage.outcome();
    assert!(outcome.done);
    assert_eq!(outcome.winners.unwrap().players, vec![0]);
    assert_eq!(stage.rounds().len(), 1);
    assert_eq!(stage.rounds()[0].resolution, Resolution::Folded);
    assert_eq!(stage.rounds()[0].fold_winner, Some(0));
    let last = stage.last_round().unwrap();
    assert_eq!(last.resolution(), Some(Resolution::Folded));
    assert_eq!(last.pot(), 1);
}
