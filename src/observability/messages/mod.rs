// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output and
//! [`StructuredLog`] to emit itself as a `tracing` event with fields.
//!
//! # Organization
//!
//! * `attribute` - attribute store and accessor dispatch events
//! * `module` - module instance role and message events
//! * `config` - configuration loading events

use tracing::Span;

pub mod attribute;
pub mod config;
pub mod module;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a `tracing` event at its level.
    fn log(&self);

    /// A span carrying the same fields, for scoping follow-up events.
    fn span(&self, name: &str) -> Span;
}
