use crate::event::{Context, Message};
use crate::level::Level;
use crate::logger::FileLogger;

/// Capability to produce a logger, for components that log through a shared
/// or borrowed [`FileLogger`].
///
/// A component owning its logger returns a reference to it; a component
/// linked to an owner object forwards to the owner's `logger()`. Either way
/// the component logs the same, and a component without any logger logs
/// nothing without erroring.
///
/// ```
/// use grouplog::{FileLogger, Level, LogSource, LoggerOptions};
/// use std::sync::Arc;
///
/// struct Application {
///     logger: Arc<FileLogger>,
/// }
///
/// impl LogSource for Application {
///     fn logger(&self) -> Option<&FileLogger> {
///         Some(&*self.logger)
///     }
/// }
///
/// struct Worker {
///     application: Arc<Application>,
/// }
///
/// impl LogSource for Worker {
///     fn logger(&self) -> Option<&FileLogger> {
///         self.application.logger()
///     }
/// }
///
/// let application = Arc::new(Application {
///     logger: Arc::new(FileLogger::new(LoggerOptions::default())),
/// });
/// let worker = Worker {
///     application: application.clone(),
/// };
/// worker.log_grouped(Level::Debug, "worker ready", "construct");
/// ```
pub trait LogSource {
    /// The logger to use, if any is available.
    fn logger(&self) -> Option<&FileLogger>;

    /// Log through the available logger. Without one this is a quiet no-op
    /// reporting `false`.
    fn log_event(&self, level: Level, message: impl Into<Message>, context: &Context) -> bool {
        match self.logger() {
            Some(logger) => logger.log(level, message, context),
            None => false,
        }
    }

    /// Shortcut for the common message-plus-group call.
    fn log_grouped(&self, level: Level, message: impl Into<Message>, group: &str) -> bool {
        self.log_event(level, message, &Context::grouped(group))
    }
}
