// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::attributes::{normalize_name, LifecyclePhase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Whether a slot holds one value or an ordered sequence of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Scalar,
    Sequence,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Scalar => f.write_str("scalar"),
            SlotKind::Sequence => f.write_str("sequence"),
        }
    }
}

/// Name-to-kind table for one module class.
///
/// Every class starts from [`AttributeSchema::base`], which declares the
/// timeout/attempts pair for each lifecycle phase. Concrete modules add their
/// own slots on top:
///
/// ```
/// use modcore::attributes::{AttributeSchema, SlotKind};
///
/// let schema = AttributeSchema::base()
///     .with("Targets", SlotKind::Sequence)
///     .with("last_seen", SlotKind::Scalar);
///
/// assert_eq!(schema.kind_of("targets"), Some(SlotKind::Sequence));
/// assert_eq!(schema.kind_of("PROCESS_TIMEOUT"), Some(SlotKind::Scalar));
/// assert_eq!(schema.kind_of("nope"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSchema {
    slots: BTreeMap<String, SlotKind>,
}

impl AttributeSchema {
    /// A schema with no slots at all.
    pub fn empty() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// The slots every module inherits.
    pub fn base() -> Self {
        let mut schema = Self::empty();
        for phase in LifecyclePhase::ALL {
            schema.declare(phase.timeout_attribute(), SlotKind::Scalar);
            schema.declare(phase.attempts_attribute(), SlotKind::Scalar);
        }
        schema
    }

    /// Declare (or redeclare) a slot.
    pub fn declare(&mut self, name: impl AsRef<str>, kind: SlotKind) -> &mut Self {
        self.slots.insert(normalize_name(name.as_ref()), kind);
        self
    }

    pub fn with(mut self, name: impl AsRef<str>, kind: SlotKind) -> Self {
        self.declare(name, kind);
        self
    }

    pub fn kind_of(&self, name: &str) -> Option<SlotKind> {
        self.slots.get(&normalize_name(name)).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for AttributeSchema {
    fn default() -> Self {
        Self::base()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_schema_declares_every_lifecycle_pair() {
        let schema = AttributeSchema::base();
        assert_eq!(schema.len(), 12);
        for name in [
            "initialize_timeout",
            "initialize_attempts",
            "reinitialize_timeout",
            "reinitialize_attempts",
            "process_timeout",
            "process_attempts",
            "abort_timeout",
            "abort_attempts",
            "cleanup_timeout",
            "cleanup_attempts",
            "host_timeout",
            "host_attempts",
        ] {
            assert_eq!(
                schema.kind_of(name),
                Some(SlotKind::Scalar),
                "missing base slot '{}'",
                name
            );
        }
    }

    #[test]
    fn test_redeclare_changes_kind() {
        let mut schema = AttributeSchema::empty();
        schema.declare("peers", SlotKind::Scalar);
        schema.declare("PEERS", SlotKind::Sequence);
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.kind_of("peers"), Some(SlotKind::Sequence));
    }
}
