//! JSONL debate transcript.
//!
//! One JSON object per line, in the order events happened:
//!
//! ```text
//! {"seq":1,"timestamp":"…","type":"debate_start","phase":"setup","question":"…","participants":[…],"config":{…}}
//! {"seq":2,"timestamp":"…","type":"round_start","phase":"opening","round":0,"speaking_order":[…]}
//! {"seq":3,"timestamp":"…","type":"argument","phase":"opening","round":0,"participant":"…","text":"…"}
//! …
//! {"seq":n,"timestamp":"…","type":"verdict","phase":"arbitration","winner":"…",…}
//! ```
//!
//! `seq`, `timestamp`, `type`, `phase` and `round` belong to the envelope;
//! payload fields with those names are dropped. A failed write is reported
//! once through `tracing` and the transcript stops there, so a truncated
//! file never has holes in `seq`.

use agora_application::{ConversationEvent, ConversationLogger, DebatePhase};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

const ENVELOPE_KEYS: [&str; 5] = ["seq", "timestamp", "type", "phase", "round"];

#[derive(Serialize)]
struct Record<'a> {
    seq: u64,
    timestamp: String,
    #[serde(rename = "type")]
    event_type: &'a str,
    phase: DebatePhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    round: Option<usize>,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl<'a> Record<'a> {
    fn new(seq: u64, event: &'a ConversationEvent) -> Self {
        let mut payload = match &event.payload {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => Map::from_iter([("data".to_string(), other.clone())]),
        };
        for key in ENVELOPE_KEYS {
            payload.remove(key);
        }

        Self {
            seq,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            event_type: event.event_type,
            phase: event.phase,
            round: event.round,
            payload,
        }
    }
}

struct Sink<W> {
    writer: W,
    /// Sequence number of the last line written
    seq: u64,
}

/// Transcript logger writing one JSON record per event.
///
/// Thread-safe via a `Mutex` around the writer. Flushes after every line
/// and on `Drop`.
pub struct JsonlConversationLogger<W: Write + Send = BufWriter<File>> {
    sink: Mutex<Sink<W>>,
    path: PathBuf,
    failed: AtomicBool,
}

impl JsonlConversationLogger {
    /// Create a transcript file at `path`, truncating any previous one.
    ///
    /// Creates parent directories as needed. Returns `None` if the file
    /// cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        match File::create(path) {
            Ok(file) => Some(Self::from_writer(BufWriter::new(file), path)),
            Err(e) => {
                warn!("Could not create transcript {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl<W: Write + Send> JsonlConversationLogger<W> {
    /// Write to an already opened sink; `path` is only used in messages.
    pub fn from_writer(writer: W, path: impl Into<PathBuf>) -> Self {
        Self {
            sink: Mutex::new(Sink { writer, seq: 0 }),
            path: path.into(),
            failed: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a write failed; no further events are written after that.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    fn give_up(&self, error: &dyn std::fmt::Display) {
        if !self.failed.swap(true, Ordering::Relaxed) {
            warn!(
                "Transcript {} stopped after a failed write: {}",
                self.path.display(),
                error
            );
        }
    }
}

impl<W: Write + Send> ConversationLogger for JsonlConversationLogger<W> {
    fn log(&self, event: ConversationEvent) {
        if self.has_failed() {
            return;
        }
        let Ok(mut sink) = self.sink.lock() else {
            self.give_up(&"writer lock poisoned");
            return;
        };

        let seq = sink.seq + 1;
        let line = match serde_json::to_string(&Record::new(seq, &event)) {
            Ok(line) => line,
            Err(e) => {
                warn!("Skipping unserializable {} event: {}", event.event_type, e);
                return;
            }
        };

        match writeln!(sink.writer, "{}", line).and_then(|()| sink.writer.flush()) {
            Ok(()) => sink.seq = seq,
            Err(e) => self.give_up(&e),
        }
    }
}

impl<W: Write + Send> Drop for JsonlConversationLogger<W> {
    fn drop(&mut self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_domain::{
        Argument, CallKind, DebateConfig, Question, Ranking, RoundIssue, Roster,
        TerminationReason, Verdict,
    };
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn verdict() -> Verdict {
        Verdict {
            consensus_reached: true,
            winner: "Visionary".into(),
            tied_leaders: Vec::new(),
            overridden: false,
            override_reasoning: None,
            termination: TerminationReason::Converged,
            winning_position: None,
            commentary: None,
        }
    }

    /// Writer whose every write fails, counting the attempts
    struct BrokenDisk {
        writes: Arc<AtomicUsize>,
    }

    impl Write for BrokenDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_transcript_lines_are_keyed_by_round_and_phase() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debate.transcript.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();
        assert_eq!(logger.path(), path);

        let question = Question::try_new("Should we adopt Rust?").unwrap();
        let roster = Roster::new(vec!["Skeptic".into(), "Critic".into()]).unwrap();
        logger.log(ConversationEvent::debate_start(
            &question,
            &roster,
            &DebateConfig::default(),
        ));
        logger.log(ConversationEvent::argument(&Argument::new(
            "Skeptic".into(),
            0,
            "The evidence is thin.",
        )));
        logger.log(ConversationEvent::ranking(&Ranking::new(
            "Critic".into(),
            1,
            vec!["Skeptic".into(), "Critic".into()],
            "sharper",
        )));
        logger.log(ConversationEvent::verdict(&verdict()));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 4);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line["seq"], i as u64 + 1);
            assert!(line["timestamp"].is_string());
        }

        assert_eq!(lines[0]["type"], "debate_start");
        assert_eq!(lines[0]["phase"], "setup");
        assert!(lines[0].get("round").is_none());
        assert_eq!(lines[0]["question"], "Should we adopt Rust?");
        assert_eq!(lines[0]["participants"][0], "Skeptic");

        assert_eq!(lines[1]["phase"], "opening");
        assert_eq!(lines[1]["round"], 0);
        assert_eq!(lines[1]["participant"], "Skeptic");

        assert_eq!(lines[2]["phase"], "voting");
        assert_eq!(lines[2]["round"], 1);
        assert_eq!(lines[2]["order"][0], "Skeptic");

        assert_eq!(lines[3]["phase"], "arbitration");
        assert_eq!(lines[3]["winner"], "Visionary");
    }

    #[test]
    fn test_payload_cannot_shadow_the_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/forfeit.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        let issue = RoundIssue::Forfeit {
            participant: "Critic".into(),
            call: CallKind::Ranking,
            attempts: 3,
            reason: "timeout".into(),
        };
        let mut event = ConversationEvent::issue(2, &issue);
        event.payload["round"] = Value::from(99);
        event.payload["type"] = Value::from("bogus");
        logger.log(event);
        drop(logger);

        let line = &read_lines(&path)[0];
        assert_eq!(line["type"], "forfeit");
        assert_eq!(line["round"], 2);
        // RoundIssue's own tag stays nested
        assert_eq!(line["issue"]["type"], "forfeit");
        assert_eq!(line["issue"]["participant"], "Critic");
    }

    #[test]
    fn test_write_failure_stops_the_transcript() {
        let writes = Arc::new(AtomicUsize::new(0));
        let logger = JsonlConversationLogger::from_writer(
            BrokenDisk {
                writes: writes.clone(),
            },
            "/dev/full",
        );
        assert!(!logger.has_failed());

        logger.log(ConversationEvent::verdict(&verdict()));
        assert!(logger.has_failed());
        let attempts = writes.load(Ordering::SeqCst);
        assert!(attempts > 0);

        // Later events are dropped without touching the writer
        logger.log(ConversationEvent::verdict(&verdict()));
        logger.log(ConversationEvent::verdict(&verdict()));
        assert_eq!(writes.load(Ordering::SeqCst), attempts);
    }
}
