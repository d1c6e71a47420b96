use serde::{Deserialize, Serialize};
use std::fmt;

use crate::channel::Channel;
use crate::errors::TransportError;
use crate::protocol::Message;

/// Severity passed to [`ApiBridge::logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The process's API handle as seen by this core.
///
/// Implementations own serialization and framing. `put_args` receives the
/// destination exactly as resolved, which may be `None`; what that means is up
/// to the implementation.
pub trait ApiBridge: Send + Sync {
    fn put_args(&self, channel: Option<&Channel>, message: &Message) -> Result<(), TransportError>;

    fn logging(&self, level: LogLevel, args: fmt::Arguments<'_>);
}
