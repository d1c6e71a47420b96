// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced to module implementations.

use crate::errors::{AttributeError, TransportError};
use thiserror::Error;

/// Problems with the process-wide API handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No API handle has been installed in this process.
    #[error("API handle is not available in this process")]
    Unavailable,

    /// `install` was called a second time.
    #[error("API handle is already installed for this process")]
    AlreadyInstalled,
}

/// Error type returned by module-facing operations and lifecycle hooks.
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Passed through unchanged from the bridge.
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Attribute(#[from] AttributeError),

    /// Failure raised by a module's own logic.
    #[error("Module '{class}' failed: {reason}")]
    Failed { class: String, reason: String },
}
