// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Process-wide attribute store with explicit per-class schemas.
//!
//! Module code reads and writes named settings either through the typed
//! [`Attributes`] operations or, by name, through an `<op>_<name>` accessor
//! call (see [`dispatch`]). The twelve lifecycle slots from
//! [`AttributeSchema::base`] exist for every class.

mod dispatch;
mod lifecycle;
mod schema;
mod store;

pub use dispatch::{dispatch, AccessorCall, AccessorOp};
pub use lifecycle::{LifecyclePhase, LifecyclePolicy};
pub use schema::{AttributeSchema, SlotKind};
pub use store::{AttributeStore, AttributeValue, Attributes};

/// Canonical form of a slot name: trimmed, lower-case ASCII.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
