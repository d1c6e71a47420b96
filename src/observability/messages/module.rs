// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for module instance events.
//!
//! This module contains message types for logging events related to:
//! * Role data being attached to an instance
//! * Messages handed to, or received from, the bridge
//! * A missing process API handle

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Role data attached to an instance.
///
/// # Log Level
/// `debug!` - Happens once per fork
pub struct RoleAttached<'a> {
    pub class: &'a str,
    pub role: &'a str,
    pub channel: Option<&'a str>,
}

impl Display for RoleAttached<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' assumed {} role on channel {}",
            self.class,
            self.role,
            self.channel.unwrap_or("<none>")
        )
    }
}

impl StructuredLog for RoleAttached<'_> {
    fn log(&self) {
        tracing::debug!(
            class = self.class,
            role = self.role,
            channel = self.channel,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "role",
            span_name = name,
            class = self.class,
            role = self.role,
            channel = self.channel,
        )
    }
}

/// A message was accepted by the bridge.
///
/// # Log Level
/// `trace!` - Per-message traffic
///
/// # Example
/// ```
/// use modcore::observability::messages::module::MessageSent;
///
/// let msg = MessageSent {
///     class: "echo",
///     tag: "KEEPALIVE",
///     fields: 0,
///     channel: None,
/// };
///
/// assert_eq!(msg.to_string(), "Module 'echo' sent KEEPALIVE (0 fields) on <none>");
/// ```
pub struct MessageSent<'a> {
    pub class: &'a str,
    pub tag: &'a str,
    pub fields: usize,
    pub channel: Option<&'a str>,
}

impl Display for MessageSent<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' sent {} ({} fields) on {}",
            self.class,
            self.tag,
            self.fields,
            self.channel.unwrap_or("<none>")
        )
    }
}

impl StructuredLog for MessageSent<'_> {
    fn log(&self) {
        tracing::trace!(
            class = self.class,
            tag = self.tag,
            fields = self.fields,
            channel = self.channel,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "message_sent",
            span_name = name,
            class = self.class,
            tag = self.tag,
            channel = self.channel,
        )
    }
}

/// A module picked up a message for processing.
///
/// # Log Level
/// `trace!` - Per-message traffic
pub struct MessageReceived<'a> {
    pub class: &'a str,
    pub tag: &'a str,
    pub fields: usize,
}

impl Display for MessageReceived<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' received {} ({} fields)",
            self.class, self.tag, self.fields
        )
    }
}

impl StructuredLog for MessageReceived<'_> {
    fn log(&self) {
        tracing::trace!(
            class = self.class,
            tag = self.tag,
            fields = self.fields,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "message_received",
            span_name = name,
            class = self.class,
            tag = self.tag,
        )
    }
}

/// A message could not be sent because no API handle exists.
///
/// # Log Level
/// `warn!` - The caller gets an error back as well
pub struct ApiUnavailable<'a> {
    pub class: &'a str,
    pub tag: &'a str,
}

impl Display for ApiUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' cannot send {}: no API handle in this process",
            self.class, self.tag
        )
    }
}

impl StructuredLog for ApiUnavailable<'_> {
    fn log(&self) {
        tracing::warn!(class = self.class, tag = self.tag, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("api_unavailable", span_name = name, class = self.class)
    }
}
