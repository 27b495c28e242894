use crate::event::{Context, Message};
use crate::level::Level;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;

/// Causes behind a failed append. The plain [`write`](FileSink::write)
/// surface reports success/failure only; [`try_write`](FileSink::try_write)
/// exposes the cause for callers that want to escalate.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no log destination configured")]
    NoDestination,

    #[error("failed to open log file '{path}' for append: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append to log file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Append-only file destination.
///
/// The file is opened in append mode and closed again on every write, so the
/// destination may be created, rotated or removed externally between calls.
/// Each entry goes out as one short append; this relies on the OS keeping
/// such appends atomic, and no extra locking is done.
#[derive(Debug, Clone, Default)]
pub struct FileSink {
    path: Option<PathBuf>,
    force_log_trace: bool,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            force_log_trace: false,
        }
    }

    /// A sink without a destination: every write fails silently.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Log the attachment trace whenever an error-grade message carries one,
    /// regardless of the per-event flag.
    pub fn with_force_log_trace(mut self, force: bool) -> Self {
        self.force_log_trace = force;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one formatted entry. Returns `true` only if the append
    /// succeeded; an unwritable or missing destination is a silent no-op.
    pub fn write(&self, level: Level, message: &Message, context: &Context) -> bool {
        self.try_write(level, message, context).is_ok()
    }

    /// Same as [`write`](Self::write), surfacing the failure cause.
    pub fn try_write(
        &self,
        level: Level,
        message: &Message,
        context: &Context,
    ) -> Result<(), SinkError> {
        let path = self.path.as_deref().ok_or(SinkError::NoDestination)?;

        let mut entry = format_line(&message.render());
        entry.push('\n');

        if let Some(extra) = context.extra_info_line() {
            entry.push('\t');
            entry.push_str(&extra);
            entry.push('\n');
        }

        if level.logs_trace()
            && (context.force_log_trace() || self.force_log_trace)
            && let Some(attachment) = context.attachment()
            && !attachment.trace.is_empty()
        {
            entry.push_str(&attachment.trace);
            entry.push('\n');
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|source| SinkError::Open {
                path: path.display().to_string(),
                source,
            })?;

        file.write_all(entry.as_bytes())
            .map_err(|source| SinkError::Write {
                path: path.display().to_string(),
                source,
            })
    }
}

/// `[dd-mm-yyyy HH:MM:SS]: <pid>: <message>`
fn format_line(message: &str) -> String {
    format!(
        "[{}]: {}: {}",
        Local::now().format("%d-%m-%Y %H:%M:%S"),
        process::id(),
        message
    )
}
