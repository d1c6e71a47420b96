// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Concrete bridges and reference modules.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process transport and a reference module:
//! - **LocalBridge**: `ApiBridge` that routes each channel to a tokio queue
//! - **EchoModule**: echoes records and keepalives back to whoever sent them
//! - **Use Case**: demos, tests, single-process deployments
//!
//! ## Stub Backend (Test-Only)
//! - **RecordingBridge**: remembers every message and log line
//! - **FailingBridge**: transport that always refuses
//! - **Note**: NOT available in production builds
//!
//! # Example
//!
//! ```rust
//! use modcore::backends::local::LocalBridge;
//! use modcore::protocol::{build_keepalive, is_keepalive};
//! use modcore::traits::ApiBridge;
//!
//! let bridge = LocalBridge::new();
//! let mut rx = bridge.open_channel("child-7".into());
//! bridge.put_args(Some(&"child-7".into()), &build_keepalive())?;
//! assert!(is_keepalive(&rx.try_recv().unwrap()));
//! # Ok::<(), modcore::errors::TransportError>(())
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
