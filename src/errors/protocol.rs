// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors produced while decoding an inbound message unit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// The tag string is not one of `CONFIG`, `RECORD`, `KEEPALIVE`.
    #[error("Unknown message tag: {0}")]
    UnknownTag(String),

    /// The first element of the unit is not a string.
    #[error("Message tag must be a string, found {0}")]
    NonStringTag(String),

    /// An array unit with no elements carries no tag at all.
    #[error("Empty message: no tag present")]
    Empty,

    /// The tag never carries payload, but the unit did.
    #[error("{tag} messages carry no payload, found {len} field(s)")]
    UnexpectedPayload { tag: String, len: usize },
}
