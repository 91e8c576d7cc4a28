//! ---
//! act_section: "05-access-control"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Flat-file user roles and usage logging."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
//! Append-only usage log.
//!
//! JSON lines with a versioned header line first. Reopening an existing
//! log scans it once to recover the next sequence number, so sequences
//! stay monotonic across process restarts. Reads are strict — a corrupt
//! line surfaces as an error — while sequence recovery is tolerant and
//! simply skips lines it cannot parse.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::Digest;
use strum::Display;

use crate::{AccessError, Result};

/// Format version stamped into the header line.
const USAGE_LOG_VERSION: u16 = 1;

/// How many events the admin activity view shows by default.
pub const DEFAULT_TAIL_LIMIT: usize = 50;

/// Usage log file header stored as the first line.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UsageLogHeader {
    version: u16,
    created_at: DateTime<Utc>,
    hash: String,
}

impl UsageLogHeader {
    fn new() -> Self {
        let created_at = Utc::now();
        let hash = format!(
            "{:x}",
            sha2::Sha256::digest(created_at.to_rfc3339().as_bytes())
        );
        Self {
            version: USAGE_LOG_VERSION,
            created_at,
            hash,
        }
    }
}

/// What kind of activity an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UsageAction {
    /// A user logged in.
    Login,
    /// A generation run completed.
    Generate,
    /// Reference data was fetched on its own.
    Fetch,
}

/// One recorded activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    /// Sequential identifier assigned when appending.
    pub sequence: u64,
    /// When the activity was recorded.
    pub timestamp: DateTime<Utc>,
    /// Normalized username the activity belongs to.
    pub username: String,
    /// Activity kind.
    pub action: UsageAction,
    /// Free-form JSON payload (province, row counts, artifact paths).
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl UsageEvent {
    /// Construct an event; the sequence is assigned on append.
    pub fn new(username: &str, action: UsageAction, detail: serde_json::Value) -> Self {
        Self {
            sequence: 0,
            timestamp: Utc::now(),
            username: username.to_owned(),
            action,
            detail,
        }
    }
}

/// Append-only writer for the usage log.
pub struct UsageLogWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    next_sequence: u64,
}

impl UsageLogWriter {
    /// Open a usage log for appending, writing a header if the file is new.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let exists = path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);

        if !exists || is_empty(path)? {
            let header = UsageLogHeader::new();
            let line = serde_json::to_string(&header)?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            return Ok(Self {
                path: path.to_path_buf(),
                writer,
                next_sequence: 0,
            });
        }

        let next_sequence = recover_last_sequence(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            next_sequence,
        })
    }

    /// Append an event and return its assigned sequence number.
    pub fn append(&mut self, mut event: UsageEvent) -> Result<u64> {
        self.next_sequence += 1;
        event.sequence = self.next_sequence;
        let line = serde_json::to_string(&event)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(event.sequence)
    }

    /// Flush buffered writes to the underlying file handle.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Path of the log on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_empty(path: &Path) -> Result<bool> {
    Ok(fs::metadata(path)?.len() == 0)
}

fn recover_last_sequence(path: &Path) -> Result<u64> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut last = 0u64;
    for line in reader.lines().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(event) = serde_json::from_str::<UsageEvent>(&line) {
            last = event.sequence;
        }
    }
    Ok(last)
}

/// Streaming iterator over the log entries, oldest first.
pub struct UsageLogReader {
    lines: std::io::Lines<BufReader<File>>,
}

impl UsageLogReader {
    /// Open the log for sequential reading, skipping the header line.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut header = String::new();
        reader.read_line(&mut header)?;
        Ok(Self {
            lines: reader.lines(),
        })
    }
}

impl Iterator for UsageLogReader {
    type Item = Result<UsageEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.lines.next()? {
            Ok(line) if line.trim().is_empty() => self.next(),
            Ok(line) => Some(serde_json::from_str(&line).map_err(AccessError::from)),
            Err(err) => Some(Err(err.into())),
        }
    }
}

/// The most recent `limit` events, oldest first. A missing log reads as
/// empty rather than erroring, so fresh installs can show the view.
pub fn tail(path: &Path, limit: usize) -> Result<Vec<UsageEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut events = Vec::new();
    for event in UsageLogReader::open(path)? {
        events.push(event?);
    }
    let start = events.len().saturating_sub(limit);
    Ok(events.split_off(start))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn append_assigns_monotonic_sequences() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("usage.jsonl");
        let mut writer = UsageLogWriter::open(&path).unwrap();

        let first = writer
            .append(UsageEvent::new("siwanon", UsageAction::Login, json!({})))
            .unwrap();
        let second = writer
            .append(UsageEvent::new(
                "siwanon",
                UsageAction::Generate,
                json!({"rows": 72}),
            ))
            .unwrap();
        assert_eq!((first, second), (1, 2));

        let events: Vec<UsageEvent> = UsageLogReader::open(&path)
            .unwrap()
            .map(|event| event.unwrap())
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, UsageAction::Login);
        assert_eq!(events[1].detail["rows"], json!(72));
    }

    #[test]
    fn sequences_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("usage.jsonl");
        {
            let mut writer = UsageLogWriter::open(&path).unwrap();
            writer
                .append(UsageEvent::new("malee", UsageAction::Login, json!({})))
                .unwrap();
        }
        let mut writer = UsageLogWriter::open(&path).unwrap();
        let sequence = writer
            .append(UsageEvent::new("malee", UsageAction::Fetch, json!({})))
            .unwrap();
        assert_eq!(sequence, 2);
    }

    #[test]
    fn tail_returns_the_most_recent_events() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("usage.jsonl");
        let mut writer = UsageLogWriter::open(&path).unwrap();
        for n in 0..60 {
            writer
                .append(UsageEvent::new(
                    "siwanon",
                    UsageAction::Generate,
                    json!({"run": n}),
                ))
                .unwrap();
        }

        let events = tail(&path, DEFAULT_TAIL_LIMIT).unwrap();
        assert_eq!(events.len(), 50);
        assert_eq!(events.first().map(|e| e.sequence), Some(11));
        assert_eq!(events.last().map(|e| e.sequence), Some(60));
    }

    #[test]
    fn tail_of_missing_log_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("never-written.jsonl");
        assert!(tail(&path, DEFAULT_TAIL_LIMIT).unwrap().is_empty());
    }

    #[test]
    fn header_line_is_not_an_event() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("usage.jsonl");
        let mut writer = UsageLogWriter::open(&path).unwrap();
        writer
            .append(UsageEvent::new("siwanon", UsageAction::Login, json!({})))
            .unwrap();

        let body = fs::read_to_string(&path).unwrap();
        let header: serde_json::Value = serde_json::from_str(body.lines().next().unwrap()).unwrap();
        assert_eq!(header["version"], json!(USAGE_LOG_VERSION));
        assert!(header.get("hash").is_some());

        let events = tail(&path, DEFAULT_TAIL_LIMIT).unwrap();
        assert_eq!(events.len(), 1);
    }
}
