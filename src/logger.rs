use crate::event::{Context, Message};
use crate::filter::GroupFilter;
use crate::level::Level;
use crate::sink::FileSink;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

type ExtraFilter = Box<dyn Fn(Level, &Context) -> bool + Send + Sync>;

/// Construction options for [`FileLogger`].
///
/// All fields default, so host applications can embed a partial table in
/// their own config files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerOptions {
    /// Path to the log file. Not validated here; an unwritable path makes
    /// every write a silent no-op.
    pub log_file: Option<PathBuf>,
    /// Group filter expression. The default (empty) logs nothing.
    pub group_filter: String,
    /// Log the attachment trace whenever an error-grade message carries
    /// one, regardless of the per-event flag.
    pub force_log_trace: bool,
}

/// File-backed logger with group-based filtering.
///
/// The filter is the logger's only mutable state. It sits behind an
/// `RwLock` so a logger shared through `Arc` stays reconfigurable; a `log`
/// call racing a [`set_group_filter`](Self::set_group_filter) observes
/// either the old or the new filter.
///
/// ```
/// use grouplog::{Context, FileLogger, LoggerOptions};
///
/// let logger = FileLogger::new(LoggerOptions {
///     log_file: Some("/tmp/app.log".into()),
///     group_filter: "db|net".to_string(),
///     force_log_trace: false,
/// });
///
/// logger.debug("connection opened", &Context::grouped("net"));
/// logger.set_group_filter("");
/// assert!(!logger.debug("now suppressed", &Context::grouped("net")));
/// ```
pub struct FileLogger {
    sink: FileSink,
    filter: RwLock<GroupFilter>,
    extra_filter: Option<ExtraFilter>,
}

impl FileLogger {
    pub fn new(options: LoggerOptions) -> Self {
        let sink = match options.log_file {
            Some(path) => FileSink::new(path),
            None => FileSink::disconnected(),
        }
        .with_force_log_trace(options.force_log_trace);

        Self {
            sink,
            filter: RwLock::new(GroupFilter::parse(&options.group_filter)),
            extra_filter: None,
        }
    }

    /// Replace the active filter expression. Takes effect on the next `log`
    /// call; in-flight calls keep the filter they already read.
    pub fn set_group_filter(&self, expression: &str) {
        *self.filter.write().unwrap_or_else(PoisonError::into_inner) =
            GroupFilter::parse(expression);
    }

    /// The currently active filter.
    pub fn group_filter(&self) -> GroupFilter {
        self.filter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install a predicate consulted after the group filter; returning
    /// `false` suppresses the write. Custom suppression rules go here so
    /// the filter logic itself stays untouched. Set it before the logger is
    /// shared; it is part of the logger's construction, not runtime state.
    pub fn set_extra_filter(
        &mut self,
        filter: impl Fn(Level, &Context) -> bool + Send + Sync + 'static,
    ) {
        self.extra_filter = Some(Box::new(filter));
    }

    /// Log one event. Returns `true` only if a line was appended to the
    /// destination; a filtered-out event attempts no write at all.
    pub fn log(&self, level: Level, message: impl Into<Message>, context: &Context) -> bool {
        let allowed = self
            .filter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .allows(context.group());
        if !allowed {
            return false;
        }

        if let Some(extra_filter) = &self.extra_filter
            && !extra_filter(level, context)
        {
            return false;
        }

        self.sink.write(level, &message.into(), context)
    }

    pub fn debug(&self, message: impl Into<Message>, context: &Context) -> bool {
        self.log(Level::Debug, message, context)
    }

    pub fn info(&self, message: impl Into<Message>, context: &Context) -> bool {
        self.log(Level::Info, message, context)
    }

    pub fn notice(&self, message: impl Into<Message>, context: &Context) -> bool {
        self.log(Level::Notice, message, context)
    }

    pub fn warning(&self, message: impl Into<Message>, context: &Context) -> bool {
        self.log(Level::Warning, message, context)
    }

    pub fn error(&self, message: impl Into<Message>, context: &Context) -> bool {
        self.log(Level::Error, message, context)
    }

    pub fn critical(&self, message: impl Into<Message>, context: &Context) -> bool {
        self.log(Level::Critical, message, context)
    }

    pub fn alert(&self, message: impl Into<Message>, context: &Context) -> bool {
        self.log(Level::Alert, message, context)
    }

    pub fn emergency(&self, message: impl Into<Message>, context: &Context) -> bool {
        self.log(Level::Emergency, message, context)
    }
}

impl fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLogger")
            .field("sink", &self.sink)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}
