// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for attribute store events.
//!
//! This module contains message types for logging events related to:
//! * Seeding class namespaces from configuration
//! * Misuse of the `<op>_<name>` accessor path

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::panic::Location;
use tracing::Span;

/// An accessor call could not be serviced.
///
/// # Log Level
/// `error!` - Programming or configuration defect, the module keeps running
///
/// # Example
/// ```
/// use modcore::errors::AttributeError;
/// use modcore::observability::messages::attribute::AccessorMisuse;
///
/// let error = AttributeError::MalformedCall { call: "bogus".to_string() };
/// let msg = AccessorMisuse {
///     class: "echo",
///     call: "bogus",
///     caller: std::panic::Location::caller(),
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct AccessorMisuse<'a> {
    pub class: &'a str,
    pub call: &'a str,
    pub caller: &'a Location<'a>,
    pub error: &'a dyn std::error::Error,
}

impl Display for AccessorMisuse<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Accessor '{}' on module class '{}' failed at {}: {}",
            self.call, self.class, self.caller, self.error
        )
    }
}

impl StructuredLog for AccessorMisuse<'_> {
    fn log(&self) {
        tracing::error!(
            class = self.class,
            call = self.call,
            caller = %self.caller,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "accessor_misuse",
            span_name = name,
            class = self.class,
            call = self.call,
            caller = %self.caller,
        )
    }
}

/// A class namespace was filled from configuration.
///
/// # Log Level
/// `debug!` - Startup detail
pub struct NamespaceSeeded<'a> {
    pub class: &'a str,
    pub lifecycle_slots: usize,
    pub extra_slots: usize,
}

impl Display for NamespaceSeeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Seeded attributes for module class '{}': {} lifecycle slots, {} extra slots",
            self.class, self.lifecycle_slots, self.extra_slots
        )
    }
}

impl StructuredLog for NamespaceSeeded<'_> {
    fn log(&self) {
        tracing::debug!(
            class = self.class,
            lifecycle_slots = self.lifecycle_slots,
            extra_slots = self.extra_slots,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "namespace_seeded",
            span_name = name,
            class = self.class,
        )
    }
}
