//! Append-only score ledger
//!
//! Plain text, one record per line, tab-separated fields:
//! player name, score (decimal), human-readable timestamp. The file is
//! only ever appended to; "best" is recomputed by scanning the whole
//! ledger.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use super::PersistError;

/// One historical score entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub player_name: String,
    pub score: u32,
    /// Human-readable date-time, e.g. "2025-01-01 10:00"
    pub timestamp: String,
}

impl ScoreRecord {
    /// Record for `score` stamped with the local wall-clock time
    pub fn now(player_name: impl Into<String>, score: u32) -> Self {
        Self {
            player_name: player_name.into(),
            score,
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Append-only ledger backed by one text file
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one record. The ledger accepts any well-formed record;
    /// the score-qualifies-as-best gate is the caller's policy.
    pub fn append(&self, record: &ScoreRecord) -> Result<(), PersistError> {
        // Tabs and newlines in the name would corrupt the line format
        let name = record
            .player_name
            .replace(['\t', '\n', '\r'], " ");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}\t{}\t{}", name, record.score, record.timestamp)?;
        Ok(())
    }

    /// All parseable records in file order. Trailing blank lines are
    /// tolerated; malformed lines are logged and skipped.
    pub fn records(&self) -> Result<Vec<ScoreRecord>, PersistError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut records = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(record) => records.push(record),
                None => log::warn!("skipping malformed ledger line: {line:?}"),
            }
        }
        Ok(records)
    }

    /// The max-score record across the whole ledger, ties broken by
    /// the most recently appended. `NoRecords` when the ledger is empty.
    pub fn best_record(&self) -> Result<ScoreRecord, PersistError> {
        let mut best: Option<ScoreRecord> = None;
        for record in self.records()? {
            if best.as_ref().is_none_or(|b| record.score >= b.score) {
                best = Some(record);
            }
        }
        best.ok_or(PersistError::NoRecords)
    }
}

fn parse_line(line: &str) -> Option<ScoreRecord> {
    let mut fields = line.splitn(3, '\t');
    let player_name = fields.next()?.to_string();
    let score = fields.next()?.trim().parse().ok()?;
    let timestamp = fields.next()?.trim_end().to_string();
    Some(ScoreRecord {
        player_name,
        score,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str, score: u32, ts: &str) -> ScoreRecord {
        ScoreRecord {
            player_name: name.to_string(),
            score,
            timestamp: ts.to_string(),
        }
    }

    #[test]
    fn test_append_then_best() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("rank.txt"));

        ledger.append(&record("A", 200, "2025-01-01 10:00")).unwrap();
        ledger.append(&record("B", 150, "2025-01-02 11:00")).unwrap();

        let best = ledger.best_record().unwrap();
        assert_eq!(best, record("A", 200, "2025-01-01 10:00"));
    }

    #[test]
    fn test_best_tie_goes_to_most_recent() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("rank.txt"));

        ledger.append(&record("old", 200, "2025-01-01 10:00")).unwrap();
        ledger.append(&record("new", 200, "2025-02-01 10:00")).unwrap();

        assert_eq!(ledger.best_record().unwrap().player_name, "new");
    }

    #[test]
    fn test_empty_ledger_is_no_records() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("rank.txt"));

        assert!(matches!(ledger.best_record(), Err(PersistError::NoRecords)));
        assert!(ledger.records().unwrap().is_empty());
    }

    #[test]
    fn test_trailing_blank_lines_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rank.txt");
        std::fs::write(&path, "A\t90\t2025-01-01 10:00\n\n\n").unwrap();

        let ledger = Ledger::new(&path);
        let records = ledger.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].score, 90);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rank.txt");
        std::fs::write(
            &path,
            "A\t90\t2025-01-01 10:00\nnot a record\nB\tNaN\t2025-01-02 11:00\nC\t120\t2025-01-03 12:00\n",
        )
        .unwrap();

        let ledger = Ledger::new(&path);
        let records = ledger.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(ledger.best_record().unwrap().player_name, "C");
    }

    #[test]
    fn test_tabs_in_name_sanitized() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("rank.txt"));

        ledger
            .append(&record("tab\there", 10, "2025-01-01 10:00"))
            .unwrap();

        let records = ledger.records().unwrap();
        assert_eq!(records[0].player_name, "tab here");
        assert_eq!(records[0].score, 10);
    }
}
