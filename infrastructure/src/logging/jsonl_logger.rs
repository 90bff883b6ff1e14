//! Append-only JSONL transcript of a discussion.
//!
//! Every [`ConversationEvent`] becomes one line carrying its `type`, a wall
//! clock `timestamp` and a logical `seq`. Reopening an existing transcript
//! appends to it and continues the `seq` count where the file left off.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use teamforge_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use tracing::{debug, warn};

struct Transcript {
    writer: BufWriter<File>,
    next_seq: u64,
}

/// Conversation logger backed by a JSONL file
pub struct JsonlConversationLogger {
    transcript: Mutex<Transcript>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript at `path`, creating parent directories.
    ///
    /// Returns `None` when the file cannot be opened; conversation logging
    /// is best effort and never stops a discussion.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let next_seq = last_seq(path).map_or(1, |seq| seq + 1);

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open conversation log {}: {}", path.display(), e);
                return None;
            }
        };
        if next_seq > 1 {
            debug!(
                "Resuming conversation log {} at seq {}",
                path.display(),
                next_seq
            );
        }

        Some(Self {
            transcript: Mutex::new(Transcript {
                writer: BufWriter::new(file),
                next_seq,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Highest `seq` stamped on an existing transcript
fn last_seq(path: &Path) -> Option<u64> {
    let file = File::open(path).ok()?;
    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(&line).ok())
        .filter_map(|value| value.get("seq").and_then(serde_json::Value::as_u64))
        .max()
}

/// One transcript line. Object payloads are flattened next to the stamps;
/// anything else goes under `data`.
fn line_record(event: ConversationEvent, seq: u64, timestamp: String) -> serde_json::Value {
    let mut map = match event.payload {
        serde_json::Value::Object(map) => map,
        other => {
            let mut map = serde_json::Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), event.event_type.to_string().into());
    map.insert("seq".to_string(), seq.into());
    map.insert("timestamp".to_string(), timestamp.into());
    serde_json::Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Ok(mut transcript) = self.transcript.lock() else {
            return;
        };
        let seq = transcript.next_seq;
        let record = line_record(event, seq, timestamp);
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        match writeln!(transcript.writer, "{}", line).and_then(|_| transcript.writer.flush()) {
            Ok(()) => transcript.next_seq += 1,
            Err(e) => warn!("Could not write conversation log {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut transcript) = self.transcript.lock() {
            let _ = transcript.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn turn(agent: &str, text: &str) -> ConversationEvent {
        ConversationEvent::new(
            "agent_turn",
            serde_json::json!({ "agent": agent, "text": text }),
        )
    }

    #[test]
    fn test_lines_carry_type_timestamp_and_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.conversation.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "moderator_directive",
            serde_json::json!({ "agent": "Backend Developer", "phase_completed": false }),
        ));
        logger.log(turn("Backend Developer", "Here is the schema."));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "moderator_directive");
        assert_eq!(lines[0]["agent"], "Backend Developer");
        assert_eq!(lines[1]["type"], "agent_turn");
        assert_eq!(lines[1]["text"], "Here is the schema.");
        assert!(lines.iter().all(|l| l["timestamp"].is_string()));
    }

    #[test]
    fn test_seq_increases_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();
        for text in ["one", "two", "three"] {
            logger.log(turn("QA", text));
        }
        drop(logger);

        let seqs: Vec<u64> = read_lines(&path)
            .iter()
            .map(|l| l["seq"].as_u64().unwrap())
            .collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn test_reopening_appends_and_continues_seq() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");

        let first = JsonlConversationLogger::new(&path).unwrap();
        first.log(turn("QA", "before restart"));
        first.log(turn("QA", "still before"));
        drop(first);

        let resumed = JsonlConversationLogger::new(&path).unwrap();
        resumed.log(turn("QA", "after restart"));
        drop(resumed);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["text"], "before restart");
        assert_eq!(lines[2]["text"], "after restart");
        assert_eq!(lines[2]["seq"], 3);
    }

    #[test]
    fn test_non_object_payload_goes_under_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();
        logger.log(ConversationEvent::new(
            "discussion_finished",
            serde_json::json!("completed"),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "discussion_finished");
        assert_eq!(lines[0]["data"], "completed");
        assert_eq!(lines[0]["seq"], 1);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("run.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();
        assert_eq!(logger.path(), path.as_path());
        assert!(path.exists());
    }
}
