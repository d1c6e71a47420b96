// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};

use crate::channel::Channel;
use crate::errors::TransportError;
use crate::protocol::Message;
use crate::traits::{ApiBridge, LogLevel};

/// A bridge that remembers everything it was asked to send or log
#[derive(Default)]
pub struct RecordingBridge {
    sent: Mutex<Vec<(Option<Channel>, Message)>>,
    logs: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(Option<Channel>, Message)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<(LogLevel, String)> {
        self.logs.lock().unwrap().clone()
    }
}

impl ApiBridge for RecordingBridge {
    fn put_args(&self, channel: Option<&Channel>, message: &Message) -> Result<(), TransportError> {
        self.sent
            .lock()
            .unwrap()
            .push((channel.cloned(), message.clone()));
        Ok(())
    }

    fn logging(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.logs.lock().unwrap().push((level, args.to_string()));
    }
}

/// A bridge whose transport always fails for testing error propagation
pub struct FailingBridge;

impl ApiBridge for FailingBridge {
    fn put_args(&self, _channel: Option<&Channel>, _message: &Message) -> Result<(), TransportError> {
        Err(TransportError::Rejected(
            "simulated transport failure".to_string(),
        ))
    }

    fn logging(&self, _level: LogLevel, _args: fmt::Arguments<'_>) {}
}

/// Collects formatted `tracing` output so tests can assert on emitted events
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A subscriber writing every event, down to `TRACE`, into this capture.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let writer = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
