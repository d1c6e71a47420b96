// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Role-aware channel resolution.
//!
//! Each module instance handle lives either in the main process (where it
//! stands for a forked child) or inside that child. The [`Role`] records
//! which, along with the point-to-point [`Channel`] for that side, so module
//! code can send without knowing where it runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque endpoint between the main process and one child process.
///
/// What a channel name maps to is decided by the bridge that writes to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(String);

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Channel::new(name)
    }
}

/// Which side of a main/child pair an instance handle belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Role {
    /// Not forked yet, or running without IPC.
    #[default]
    Unassigned,
    /// The main process's view of a forked child; the channel leads to the child.
    Main { channel: Channel },
    /// The child itself; the channel leads back to the main process.
    Child { channel: Channel },
}

impl Role {
    pub fn is_main(&self) -> bool {
        matches!(self, Role::Main { .. })
    }

    pub fn is_child(&self) -> bool {
        matches!(self, Role::Child { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Unassigned => "unassigned",
            Role::Main { .. } => "main",
            Role::Child { .. } => "child",
        }
    }
}

/// Endpoint a message should be handed to for this role, if any.
pub fn resolve_channel(role: &Role) -> Option<&Channel> {
    match role {
        Role::Child { channel } => Some(channel),
        Role::Main { channel } => Some(channel),
        Role::Unassigned => None,
    }
}
