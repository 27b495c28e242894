pub mod error_screen;
pub mod event;
pub mod filter;
pub mod level;
pub mod logger;
pub mod sink;
pub mod source;

pub use error_screen::{
    ErrorKind, ErrorResponse, ErrorScreen, ErrorScreenOptions, MAX_HANDLED_ERRORS, ViewFormat,
    install_panic_hook,
};
pub use event::{Attachment, Context, Message};
pub use filter::GroupFilter;
pub use level::Level;
pub use logger::{FileLogger, LoggerOptions};
pub use sink::{FileSink, SinkError};
pub use source::LogSource;
