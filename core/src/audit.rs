//! Audit trail of program events.
//!
//! Each event becomes one line: `[<ISO-8601 UTC>] <message>`. This is the
//! operator-facing record of what the bot did, separate from diagnostic
//! `tracing` output.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use chrono::{DateTime, SecondsFormat, Utc};

pub trait AuditSink: Send {
    /// Append one event. Failures are reported through `tracing`, never to the caller.
    fn record(&mut self, message: &str);
}

/// Render an audit line, e.g. `[2024-05-01T12:00:00.000Z] Phase changed to CLOSED`.
#[must_use]
pub fn format_line(at: DateTime<Utc>, message: &str) -> String {
    format!(
        "[{}] {message}",
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Appends audit lines to a text file, creating it on first use.
#[derive(Debug, Clone)]
pub struct FileAuditTrail {
    path: PathBuf,
}

impl FileAuditTrail {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl AuditSink for FileAuditTrail {
    fn record(&mut self, message: &str) {
        let line = format_line(Utc::now(), message);
        if let Err(e) = self.append(&line) {
            tracing::warn!(path = %self.path.display(), "Failed to append audit line: {e}");
        }
    }
}

/// Keeps audit messages in memory. Clones share one buffer, so a caller can
/// hand a clone to the program and still read what was recorded.
#[derive(Debug, Default, Clone)]
pub struct MemoryAuditTrail {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemoryAuditTrail {
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuditSink for MemoryAuditTrail {
    fn record(&mut self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
