// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! Message types follow a struct-based pattern with a `Display` implementation
//! so log text lives in one place instead of as magic strings at call sites.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::attribute` - attribute store seeding and accessor misuse
//! * `messages::module` - role changes and message traffic of module instances
//! * `messages::config` - configuration loading
//!
//! # Usage
//!
//! ```rust
//! use modcore::observability::messages::module::MessageSent;
//! use modcore::observability::messages::StructuredLog;
//!
//! let msg = MessageSent {
//!     class: "echo",
//!     tag: "RECORD",
//!     fields: 3,
//!     channel: Some("echo.up"),
//! };
//!
//! msg.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, or `default_filter` when unset.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber installed earlier (e.g. by a test harness) stays in place.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
