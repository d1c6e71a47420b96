// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod api;           // process-global bridge handle
pub mod attributes;    // class-scoped attribute store
pub mod backends;      // reference bridge and module
pub mod channel;       // roles and channel resolution
pub mod config;        // daemon config + validation
pub mod errors;        // error handling
pub mod module;        // module instances
pub mod observability;
pub mod protocol;      // CONFIG / RECORD / KEEPALIVE messages
pub mod traits;        // bridge and module abstractions

/// Opaque message field and configuration value.
pub use serde_json::Value;

/// Configuration mapping handed to a module instance.
pub type ConfigMap = serde_json::Map<String, Value>;

pub use channel::{Channel, Role};
pub use module::{ModuleClass, ModuleInstance};
pub use protocol::{Message, Tag};
