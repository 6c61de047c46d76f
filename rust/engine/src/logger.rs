use serde::{Deserialize, Serialize};

use crate::env::PlayerId;
use crate::wager::{DecisionRecord, Resolution, WagerRound};

/// Summary of one resolved wager round.
/// Serialized to JSONL format for round history storage and statistics.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Unique identifier for this round (format: GGGG-TTTTTT)
    pub round_id: String,
    /// Game number within the session
    pub game_id: u32,
    /// Move number within the game (1-based)
    pub turn: u32,
    /// Game move that opened the round
    pub action: String,
    pub active: PlayerId,
    pub non_active: PlayerId,
    /// Decisions in the order they were requested
    pub decisions: Vec<DecisionRecord>,
    pub pot: u32,
    pub resolution: Resolution,
    /// Set when the opponent folded
    #[serde(default)]
    pub fold_winner: Option<PlayerId>,
    /// Timestamp when the round was written (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

impl RoundRecord {
    pub fn from_round(game_id: u32, turn: u32, action: &str, round: &WagerRound) -> Self {
        Self {
            round_id: format_round_id(game_id, turn),
            game_id,
            turn,
            action: action.to_string(),
            active: round.active(),
            non_active: round.non_active(),
            decisions: round.decisions().to_vec(),
            pot: round.pot(),
            resolution: round.resolution().unwrap_or(Resolution::InvalidDecision),
            fold_winner: (round.resolution() == Some(Resolution::Folded)).then(|| round.active()),
            ts: None,
        }
    }
}

pub fn format_round_id(game_id: u32, turn: u32) -> String {
    format!("{:04}-{:06}", game_id, turn)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct RoundLogger {
    writer: Box<dyn Write + Send>,
    written: u64,
}

impl RoundLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(f)))
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            written: 0,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }
}

impl std::fmt::Debug for RoundLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundLogger")
            .field("written", &self.written)
            .finish()
    }
}
