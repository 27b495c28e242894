use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Message severity, ordered from least to most severe.
///
/// The set follows the classic syslog naming. The level decides whether a
/// trace line may accompany the message; it is not itself written into the
/// log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, Error)]
#[error(
    "unknown log level: '{0}'. Valid levels are: debug, info, notice, warning, error, critical, alert, emergency"
)]
pub struct ParseLevelError(String);

impl Level {
    /// Levels that may carry an attachment trace line in the log file.
    pub fn logs_trace(self) -> bool {
        matches!(self, Level::Error | Level::Critical | Level::Emergency)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Notice => "notice",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
            Level::Alert => "alert",
            Level::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "notice" => Ok(Level::Notice),
            "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "critical" => Ok(Level::Critical),
            "alert" => Ok(Level::Alert),
            "emergency" => Ok(Level::Emergency),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
