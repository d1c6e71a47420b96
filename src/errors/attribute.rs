// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by the attribute store and the accessor dispatch layer.

use crate::attributes::SlotKind;
use thiserror::Error;

/// Failure of a typed attribute operation or of an accessor call.
///
/// Typed operations on [`Attributes`](crate::attributes::Attributes) return
/// these directly. The fail-soft accessor path logs them instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttributeError {
    /// The slot is not declared in the class schema.
    #[error("Unknown attribute '{name}' for module class '{class}'")]
    UnknownAttribute { class: String, name: String },

    /// A scalar operation was used on a sequence slot, or the other way round.
    #[error("Attribute '{name}' is a {actual} slot, but a {expected} operation was used")]
    KindMismatch {
        name: String,
        expected: SlotKind,
        actual: SlotKind,
    },

    /// The verb before the first underscore is not a supported operation.
    #[error("Unsupported accessor operation '{op}' in call '{call}'")]
    UnknownOperation { call: String, op: String },

    /// The call does not decompose into `<op>_<name>`.
    #[error("Malformed accessor call '{call}': expected '<op>_<name>'")]
    MalformedCall { call: String },

    /// Wrong number of arguments for the operation.
    #[error("Accessor '{call}' takes {expected} argument(s), got {got}")]
    Arity {
        call: String,
        expected: &'static str,
        got: usize,
    },

    /// The stored value cannot be read as the requested type.
    #[error("Attribute '{name}' holds an invalid value: {reason}")]
    InvalidValue { name: String, reason: String },
}
