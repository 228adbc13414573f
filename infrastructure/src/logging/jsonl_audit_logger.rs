//! JSONL file writer for audit events.
//!
//! Each [`AuditEvent`] is serialized as a single JSON line with `type`,
//! `decision_id` and `timestamp` fields, appended to the file via a buffered
//! writer. Existing content is kept: the audit trail spans runs.
//!
//! Timestamps come from the same [`Clock`] the use cases run on, so they
//! agree with the `decided_at` stored on the decision.

use crate::clock::SystemClock;
use agora_application::ports::audit_log::{AuditEvent, AuditLogger};
use agora_application::ports::clock::Clock;
use chrono::SecondsFormat;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// JSONL audit logger that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlAuditLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl JsonlAuditLogger {
    /// Open the audit file at the given path for appending.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            clock: Arc::new(SystemClock),
        })
    }

    /// Stamp events with `clock` instead of the wall clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: AuditEvent, timestamp: String) -> Value {
    let header = [
        ("type", Value::String(event.event_type.to_string())),
        ("decision_id", Value::String(event.decision_id.to_string())),
        ("timestamp", Value::String(timestamp)),
    ];

    match event.payload {
        Value::Object(mut map) => {
            for (key, value) in header {
                map.insert(key.to_string(), value);
            }
            Value::Object(map)
        }
        Value::Null => Value::Object(
            header
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        ),
        other => {
            let mut map: serde_json::Map<String, Value> = header
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
            map.insert("data".to_string(), other);
            Value::Object(map)
        }
    }
}

impl AuditLogger for JsonlAuditLogger {
    fn log(&self, event: AuditEvent) {
        let timestamp = self
            .clock
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let event_type = event.event_type;
        let decision_id = event.decision_id.clone();

        let line = match serde_json::to_string(&record(event, timestamp)) {
            Ok(line) => line,
            Err(e) => {
                warn!(
                    "Dropped {} audit event for {}: {}",
                    event_type, decision_id, e
                );
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!("Failed to write audit event to {}: {}", self.path.display(), e);
            }
        }
    }
}

impl Drop for JsonlAuditLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
