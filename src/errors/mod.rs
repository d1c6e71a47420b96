// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod attribute;
mod config;
mod module;
mod protocol;
mod transport;

pub use attribute::AttributeError;
pub use config::{ConfigError, ValidationError};
pub use module::{ApiError, ModuleError};
pub use protocol::ProtocolError;
pub use transport::TransportError;
