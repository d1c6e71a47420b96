// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::channel::Channel;
use thiserror::Error;

/// Failures reported by an [`ApiBridge`](crate::traits::ApiBridge) while writing
/// a message to a channel. The core never retries or masks these.
#[derive(Error, Debug)]
pub enum TransportError {
    /// No destination was given and none could be resolved from the role.
    #[error("No channel to send on")]
    NoChannel,

    /// The bridge has no route for this channel.
    #[error("Unknown channel '{0}'")]
    UnknownChannel(Channel),

    /// The other end of the channel has gone away.
    #[error("Channel '{0}' is closed")]
    Closed(Channel),

    /// Any other refusal by the transport.
    #[error("Transport rejected message: {0}")]
    Rejected(String),
}
