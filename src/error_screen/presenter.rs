use super::render::{self, ErrorResponse, ViewFormat};
use crate::event::{Attachment, Context};
use crate::logger::FileLogger;
use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Processing stops after this many handled errors. An error handler whose
/// own logging or rendering raises further errors must not loop forever.
pub const MAX_HANDLED_ERRORS: usize = 500;

/// What raised the error; becomes part of the log group (`error|<kind>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Warning,
    Fatal,
    Exception,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Warning => "warning",
            ErrorKind::Fatal => "fatal",
            ErrorKind::Exception => "exception",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction options for [`ErrorScreen`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorScreenOptions {
    pub view_format: ViewFormat,
    /// Include the trace in the HTML response.
    pub show_trace: bool,
    /// Render nothing to the user for warnings. They are still logged.
    pub hide_warning_message: bool,
    /// Render nothing to the user for fatals. They are still logged.
    pub hide_fatal_message: bool,
    /// Shown to the user in place of the real error message. The log always
    /// receives the real message.
    pub common_error_message: Option<String>,
}

impl Default for ErrorScreenOptions {
    fn default() -> Self {
        Self {
            view_format: ViewFormat::Html,
            show_trace: false,
            hide_warning_message: true,
            hide_fatal_message: true,
            common_error_message: None,
        }
    }
}

/// Catches runtime error signals, logs them with group `error|<kind>`, and
/// renders a user-facing response in the configured format.
///
/// The screen holds its logger and options behind locks so one instance can
/// be shared (`Arc`) between the panic hook and request-handling code.
pub struct ErrorScreen {
    options: RwLock<ErrorScreenOptions>,
    logger: RwLock<Option<Arc<FileLogger>>>,
    handled: AtomicUsize,
}

impl ErrorScreen {
    pub fn new(options: ErrorScreenOptions) -> Self {
        Self {
            options: RwLock::new(options),
            logger: RwLock::new(None),
            handled: AtomicUsize::new(0),
        }
    }

    pub fn set_logger(&self, logger: Arc<FileLogger>) {
        *self.logger.write().unwrap_or_else(PoisonError::into_inner) = Some(logger);
    }

    pub fn logger(&self) -> Option<Arc<FileLogger>> {
        self.logger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_view_format(&self, format: ViewFormat) {
        self.update(|options| options.view_format = format);
    }

    pub fn set_show_trace(&self, show: bool) {
        self.update(|options| options.show_trace = show);
    }

    pub fn set_show_warning_message(&self, show: bool) {
        self.update(|options| options.hide_warning_message = !show);
    }

    pub fn set_show_fatal_message(&self, show: bool) {
        self.update(|options| options.hide_fatal_message = !show);
    }

    pub fn set_common_error_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|options| options.common_error_message = Some(message));
    }

    /// Number of errors processed so far.
    pub fn handled_count(&self) -> usize {
        self.handled.load(Ordering::Relaxed)
    }

    /// Convenience entry point for a caught error value.
    pub fn report_caught(&self, error: &(dyn StdError + 'static)) -> Option<ErrorResponse> {
        self.process_error(&Attachment::from_error(error), ErrorKind::Exception)
    }

    /// Log the error and decide what, if anything, to show the user.
    ///
    /// Returns `None` when the error-volume cutoff was reached, when the
    /// configured toggles hide this kind, or when a fatal arrives in a
    /// non-HTML format (there is no page left to render into).
    pub fn process_error(&self, error: &Attachment, kind: ErrorKind) -> Option<ErrorResponse> {
        if self.handled.fetch_add(1, Ordering::Relaxed) >= MAX_HANDLED_ERRORS {
            return None;
        }

        if let Some(logger) = self.logger() {
            let context = Context::new()
                .with_group(format!("error|{kind}"))
                .with_attachment(error.clone());
            logger.error(error.message.as_str(), &context);
        }

        let options = self.current_options();

        if options.hide_warning_message && kind == ErrorKind::Warning {
            return None;
        }
        if options.hide_fatal_message && kind == ErrorKind::Fatal {
            return None;
        }
        if options.view_format != ViewFormat::Html && kind == ErrorKind::Fatal {
            return None;
        }

        let message = options
            .common_error_message
            .as_deref()
            .unwrap_or(error.message.as_str());
        let trace =
            (options.show_trace && !error.trace.is_empty()).then_some(error.trace.as_str());

        Some(render::render(options.view_format, message, trace))
    }

    fn update(&self, apply: impl FnOnce(&mut ErrorScreenOptions)) {
        apply(&mut self.options.write().unwrap_or_else(PoisonError::into_inner));
    }

    fn current_options(&self) -> ErrorScreenOptions {
        self.options
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for ErrorScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorScreen")
            .field("options", &self.options)
            .field("handled", &self.handled)
            .finish_non_exhaustive()
    }
}

/// Route panics through `screen` as fatal errors, keeping any previously
/// installed hook in the chain. The hook captures a backtrace as the trace
/// text; whether the user sees anything still follows the screen's options.
pub fn install_panic_hook(screen: Arc<ErrorScreen>) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic".to_string());
        let location = info
            .location()
            .map(|location| format!(" at {}:{}", location.file(), location.line()))
            .unwrap_or_default();

        let attachment = Attachment::new(
            format!("Fatal error: {payload}{location}"),
            Backtrace::force_capture().to_string(),
        );
        screen.process_error(&attachment, ErrorKind::Fatal);

        previous(info);
    }));
}
