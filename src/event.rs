use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::Write;

/// A log message payload.
///
/// Non-string payloads are carried as structured JSON and rendered to a
/// readable multi-line dump when written.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String),
    Structured(Value),
}

impl Message {
    /// Render to the string form written to the log file.
    pub fn render(&self) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        Message::Structured(value)
    }
}

/// Exception-like detail attached to a log event: the error message plus a
/// rendered trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub message: String,
    pub trace: String,
}

impl Attachment {
    pub fn new(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: trace.into(),
        }
    }

    /// Build an attachment from an error value, rendering its `source()`
    /// chain as the trace text.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let mut trace = String::new();
        let mut source = error.source();
        while let Some(cause) = source {
            let _ = writeln!(trace, "caused by: {cause}");
            source = cause.source();
        }

        Self {
            message: error.to_string(),
            trace: trace.trim_end().to_string(),
        }
    }
}

/// Auxiliary data accompanying a single log call: the event's group, an
/// optional attachment, and free-form extra information.
#[derive(Debug, Clone, Default)]
pub struct Context {
    group: String,
    attachment: Option<Attachment>,
    extra_info: Option<String>,
    extra: BTreeMap<String, String>,
    force_log_trace: bool,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortcut for the common case of a context carrying only a group.
    pub fn grouped(group: impl Into<String>) -> Self {
        Self::new().with_group(group)
    }

    /// The event's group, possibly several tokens joined with `|`.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Free text appended as an indented line after the message line.
    pub fn with_extra_info(mut self, text: impl Into<String>) -> Self {
        self.extra_info = Some(text.into());
        self
    }

    /// Auxiliary key/value data; rendered into the indented extra-info line
    /// when no explicit extra-info text is set.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Request the attachment trace for this one event, regardless of the
    /// sink-level setting.
    pub fn with_force_log_trace(mut self, force: bool) -> Self {
        self.force_log_trace = force;
        self
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn force_log_trace(&self) -> bool {
        self.force_log_trace
    }

    /// The indented line written after the message, if any: the explicit
    /// extra-info text, or the extra map as `key=value` pairs.
    pub fn extra_info_line(&self) -> Option<String> {
        if let Some(text) = &self.extra_info {
            return Some(text.clone());
        }
        if self.extra.is_empty() {
            return None;
        }
        Some(
            self.extra
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
