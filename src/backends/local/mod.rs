// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod bridge;
pub mod echo;

pub use bridge::{ChannelLink, LocalBridge};
pub use echo::{EchoModule, ECHO_CLASS};
