// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::attributes::{normalize_name, AttributeSchema, LifecyclePhase, LifecyclePolicy, SlotKind};
use crate::config::DaemonConfig;
use crate::errors::AttributeError;
use crate::module::ModuleClass;
use crate::observability::messages::attribute::NamespaceSeeded;
use crate::observability::messages::StructuredLog;
use crate::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// What a `get` hands back: the scalar, or the whole sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Scalar(Value),
    Sequence(Vec<Value>),
}

impl AttributeValue {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            AttributeValue::Scalar(value) => Some(value),
            AttributeValue::Sequence(_) => None,
        }
    }

    pub fn into_scalar(self) -> Option<Value> {
        match self {
            AttributeValue::Scalar(value) => Some(value),
            AttributeValue::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            AttributeValue::Sequence(values) => Some(values),
            AttributeValue::Scalar(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct Namespace {
    schema: AttributeSchema,
    scalars: HashMap<String, Value>,
    sequences: HashMap<String, VecDeque<Value>>,
}

impl Namespace {
    fn checked_kind(
        &self,
        class: &ModuleClass,
        name: &str,
        expected: Option<SlotKind>,
    ) -> Result<SlotKind, AttributeError> {
        let actual = self
            .schema
            .kind_of(name)
            .ok_or_else(|| AttributeError::UnknownAttribute {
                class: class.to_string(),
                name: name.to_string(),
            })?;
        match expected {
            Some(expected) if expected != actual => Err(AttributeError::KindMismatch {
                name: name.to_string(),
                expected,
                actual,
            }),
            _ => Ok(actual),
        }
    }
}

/// Process-wide named slots, one namespace per module class.
///
/// The store is a cheap handle: clones share the same slots, so every
/// instance of a class that was handed the same store sees the same values,
/// last writer wins. Nothing is shared across processes; a forked child keeps
/// its own copy.
///
/// ```
/// use modcore::attributes::{AttributeStore, AttributeSchema, SlotKind};
/// use serde_json::json;
///
/// let store = AttributeStore::new();
/// store.register_class("poller", AttributeSchema::base().with("targets", SlotKind::Sequence));
///
/// let a = store.namespace("poller");
/// let b = store.namespace("poller");
/// a.push("targets", json!("10.0.0.1")).unwrap();
/// assert_eq!(b.get_sequence("targets").unwrap(), vec![json!("10.0.0.1")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    namespaces: Arc<RwLock<HashMap<ModuleClass, Namespace>>>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the schema for a class.
    ///
    /// Values already stored under a name that keeps its kind survive; the rest
    /// are dropped. Classes that are never registered use [`AttributeSchema::base`].
    pub fn register_class(&self, class: impl Into<ModuleClass>, schema: AttributeSchema) {
        let class = class.into();
        self.write(|namespaces| {
            let namespace = namespaces.entry(class).or_default();
            namespace
                .scalars
                .retain(|name, _| schema.kind_of(name) == Some(SlotKind::Scalar));
            namespace
                .sequences
                .retain(|name, _| schema.kind_of(name) == Some(SlotKind::Sequence));
            namespace.schema = schema;
        });
    }

    /// Class-scoped view of the store.
    pub fn namespace(&self, class: impl Into<ModuleClass>) -> Attributes {
        Attributes {
            store: self.clone(),
            class: class.into(),
        }
    }

    pub fn classes(&self) -> Vec<ModuleClass> {
        let mut classes: Vec<ModuleClass> =
            self.read(|namespaces| namespaces.keys().cloned().collect());
        classes.sort();
        classes
    }

    /// Fill lifecycle and extra attribute slots for every configured module.
    ///
    /// Schemas must already be registered for classes that seed extra
    /// attributes. Every extra attribute of every module is checked against
    /// its schema first: an undeclared name fails with `UnknownAttribute`, an
    /// array for a scalar slot (or the reverse) with `KindMismatch`, and in
    /// either case nothing is written.
    pub fn seed_from_config(&self, config: &DaemonConfig) -> Result<(), AttributeError> {
        for module in &config.modules {
            let attributes = self.namespace(module.class.as_str());
            for (name, value) in &module.attributes {
                attributes.kind_of(name, Some(seed_kind(value)))?;
            }
        }

        for module in &config.modules {
            let attributes = self.namespace(module.class.as_str());
            for phase in LifecyclePhase::ALL {
                attributes.set_lifecycle_policy(phase, config.lifecycle_policy(module, phase))?;
            }
            for (name, value) in &module.attributes {
                match value {
                    Value::Array(items) => attributes.put(name, items.clone())?,
                    other => attributes.set(name, other.clone())?,
                }
            }
            NamespaceSeeded {
                class: &module.class,
                lifecycle_slots: LifecyclePhase::ALL.len() * 2,
                extra_slots: module.attributes.len(),
            }
            .log();
        }
        Ok(())
    }

    // Slots are only mutated in place, so a panic under the lock leaves
    // every slot whole and a poisoned lock still holds consistent data.
    fn read<R>(&self, f: impl FnOnce(&HashMap<ModuleClass, Namespace>) -> R) -> R {
        let guard = self.namespaces.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut HashMap<ModuleClass, Namespace>) -> R) -> R {
        let mut guard = self.namespaces.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

fn seed_kind(value: &Value) -> SlotKind {
    match value {
        Value::Array(_) => SlotKind::Sequence,
        _ => SlotKind::Scalar,
    }
}

/// One module class's slots.
#[derive(Debug, Clone)]
pub struct Attributes {
    store: AttributeStore,
    class: ModuleClass,
}

impl Attributes {
    pub fn class(&self) -> &ModuleClass {
        &self.class
    }

    /// Kind of a declared slot, failing if it is undeclared or not `expected`.
    pub fn kind_of(&self, name: &str, expected: Option<SlotKind>) -> Result<SlotKind, AttributeError> {
        self.with_namespace(
            |namespace, name| namespace.checked_kind(&self.class, &name, expected),
            name,
        )
    }

    fn with_namespace<R>(
        &self,
        f: impl FnOnce(&mut Namespace, String) -> Result<R, AttributeError>,
        name: &str,
    ) -> Result<R, AttributeError> {
        let name = normalize_name(name);
        self.store.write(|namespaces| {
            let namespace = namespaces.entry(self.class.clone()).or_default();
            f(namespace, name)
        })
    }

    fn with_sequence<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut VecDeque<Value>) -> R,
    ) -> Result<R, AttributeError> {
        self.with_namespace(
            |namespace, name| {
                namespace.checked_kind(&self.class, &name, Some(SlotKind::Sequence))?;
                Ok(f(namespace.sequences.entry(name).or_default()))
            },
            name,
        )
    }

    /// Read the whole slot: the scalar (if set), or the full sequence.
    pub fn get(&self, name: &str) -> Result<Option<AttributeValue>, AttributeError> {
        self.with_namespace(
            |namespace, name| match namespace.checked_kind(&self.class, &name, None)? {
                SlotKind::Scalar => Ok(namespace
                    .scalars
                    .get(&name)
                    .cloned()
                    .map(AttributeValue::Scalar)),
                SlotKind::Sequence => Ok(Some(AttributeValue::Sequence(
                    namespace
                        .sequences
                        .get(&name)
                        .map(|values| values.iter().cloned().collect())
                        .unwrap_or_default(),
                ))),
            },
            name,
        )
    }

    pub fn get_scalar(&self, name: &str) -> Result<Option<Value>, AttributeError> {
        self.with_namespace(
            |namespace, name| {
                namespace.checked_kind(&self.class, &name, Some(SlotKind::Scalar))?;
                Ok(namespace.scalars.get(&name).cloned())
            },
            name,
        )
    }

    pub fn get_sequence(&self, name: &str) -> Result<Vec<Value>, AttributeError> {
        self.with_sequence(name, |values| values.iter().cloned().collect())
    }

    /// Overwrite a scalar slot.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), AttributeError> {
        let value = value.into();
        self.with_namespace(
            |namespace, name| {
                namespace.checked_kind(&self.class, &name, Some(SlotKind::Scalar))?;
                namespace.scalars.insert(name, value);
                Ok(())
            },
            name,
        )
    }

    /// Overwrite a sequence slot with the given values.
    pub fn put(
        &self,
        name: &str,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<(), AttributeError> {
        let values: VecDeque<Value> = values.into_iter().collect();
        self.with_namespace(
            |namespace, name| {
                namespace.checked_kind(&self.class, &name, Some(SlotKind::Sequence))?;
                namespace.sequences.insert(name, values);
                Ok(())
            },
            name,
        )
    }

    pub fn push(&self, name: &str, value: impl Into<Value>) -> Result<(), AttributeError> {
        let value = value.into();
        self.with_sequence(name, |values| values.push_back(value))
    }

    /// Push, then shift the oldest values off until at most `cap` remain.
    /// Returns how many were dropped.
    pub fn push_capped(
        &self,
        name: &str,
        value: impl Into<Value>,
        cap: usize,
    ) -> Result<usize, AttributeError> {
        let value = value.into();
        self.with_sequence(name, |values| {
            values.push_back(value);
            let excess = values.len().saturating_sub(cap);
            values.drain(..excess);
            excess
        })
    }

    pub fn pop(&self, name: &str) -> Result<Option<Value>, AttributeError> {
        self.with_sequence(name, |values| values.pop_back())
    }

    pub fn unshift(&self, name: &str, value: impl Into<Value>) -> Result<(), AttributeError> {
        let value = value.into();
        self.with_sequence(name, |values| values.push_front(value))
    }

    pub fn shift(&self, name: &str) -> Result<Option<Value>, AttributeError> {
        self.with_sequence(name, |values| values.pop_front())
    }

    /// Timeout and attempts for a phase, falling back to the built-in policy
    /// for whichever half is unset.
    pub fn lifecycle_policy(&self, phase: LifecyclePhase) -> Result<LifecyclePolicy, AttributeError> {
        let defaults = phase.default_policy();

        let timeout_name = phase.timeout_attribute();
        let timeout = match self.get_scalar(&timeout_name)? {
            None => defaults.timeout,
            Some(value) => value
                .as_f64()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .ok_or_else(|| AttributeError::InvalidValue {
                    name: timeout_name.clone(),
                    reason: format!("expected a non-negative number of seconds, found {}", value),
                })?,
        };

        let attempts_name = phase.attempts_attribute();
        let attempts = match self.get_scalar(&attempts_name)? {
            None => defaults.attempts,
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| AttributeError::InvalidValue {
                    name: attempts_name.clone(),
                    reason: format!("expected a whole number of attempts, found {}", value),
                })?,
        };

        Ok(LifecyclePolicy { timeout, attempts })
    }

    pub fn set_lifecycle_policy(
        &self,
        phase: LifecyclePhase,
        policy: LifecyclePolicy,
    ) -> Result<(), AttributeError> {
        let timeout = if policy.timeout.subsec_nanos() == 0 {
            Value::from(policy.timeout.as_secs())
        } else {
            Value::from(policy.timeout.as_secs_f64())
        };
        self.set(&phase.timeout_attribute(), timeout)?;
        self.set(&phase.attempts_attribute(), policy.attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with(name: &str, kind: SlotKind) -> AttributeStore {
        let store = AttributeStore::new();
        store.register_class("test", AttributeSchema::base().with(name, kind));
        store
    }

    #[test]
    fn test_set_then_get_returns_scalar() {
        let attrs = store_with("x", SlotKind::Scalar).namespace("test");
        attrs.set("x", 5).unwrap();
        assert_eq!(attrs.get("x").unwrap(), Some(AttributeValue::Scalar(json!(5))));
        assert_eq!(attrs.get_scalar("X").unwrap(), Some(json!(5)));
    }

    #[test]
    fn test_unset_scalar_is_undefined_and_unset_sequence_is_empty() {
        let store = store_with("xs", SlotKind::Sequence);
        let attrs = store.namespace("test");
        assert_eq!(attrs.get("process_timeout").unwrap(), None);
        assert_eq!(attrs.get("xs").unwrap(), Some(AttributeValue::Sequence(vec![])));
    }

    #[test]
    fn test_push_pop_unshift_shift() {
        let attrs = store_with("x", SlotKind::Sequence).namespace("test");

        attrs.push("x", 1).unwrap();
        attrs.push("x", 2).unwrap();
        assert_eq!(attrs.pop("x").unwrap(), Some(json!(2)));
        assert_eq!(attrs.get_sequence("x").unwrap(), vec![json!(1)]);

        attrs.unshift("x", 0).unwrap();
        assert_eq!(attrs.get_sequence("x").unwrap(), vec![json!(0), json!(1)]);
        assert_eq!(attrs.shift("x").unwrap(), Some(json!(0)));
        assert_eq!(attrs.get_sequence("x").unwrap(), vec![json!(1)]);
    }

    #[test]
    fn test_pop_and_shift_on_empty_sequence() {
        let attrs = store_with("x", SlotKind::Sequence).namespace("test");
        assert_eq!(attrs.pop("x").unwrap(), None);
        assert_eq!(attrs.shift("x").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites_whole_sequence() {
        let attrs = store_with("x", SlotKind::Sequence).namespace("test");
        attrs.push("x", "old").unwrap();
        attrs.put("x", vec![json!("a"), json!("b")]).unwrap();
        assert_eq!(attrs.get_sequence("x").unwrap(), vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_unknown_attribute_is_typed_error() {
        let attrs = AttributeStore::new().namespace("test");
        let err = attrs.set("missing", 1).unwrap_err();
        assert_eq!(
            err,
            AttributeError::UnknownAttribute {
                class: "test".to_string(),
                name: "missing".to_string(),
            }
        );
    }

    #[test]
    fn test_kind_mismatch_table_driven() {
        struct TestCase {
            name: &'static str,
            slot_kind: SlotKind,
            op: fn(&Attributes) -> Result<(), AttributeError>,
            expected: SlotKind,
        }

        let test_cases = vec![
            TestCase {
                name: "set on sequence",
                slot_kind: SlotKind::Sequence,
                op: |a| a.set("x", 1),
                expected: SlotKind::Scalar,
            },
            TestCase {
                name: "push on scalar",
                slot_kind: SlotKind::Scalar,
                op: |a| a.push("x", 1),
                expected: SlotKind::Sequence,
            },
            TestCase {
                name: "shift on scalar",
                slot_kind: SlotKind::Scalar,
                op: |a| a.shift("x").map(|_| ()),
                expected: SlotKind::Sequence,
            },
            TestCase {
                name: "put on scalar",
                slot_kind: SlotKind::Scalar,
                op: |a| a.put("x", vec![]),
                expected: SlotKind::Sequence,
            },
        ];

        for test_case in test_cases {
            let attrs = store_with("x", test_case.slot_kind).namespace("test");
            let err = (test_case.op)(&attrs).unwrap_err();
            assert_eq!(
                err,
                AttributeError::KindMismatch {
                    name: "x".to_string(),
                    expected: test_case.expected,
                    actual: test_case.slot_kind,
                },
                "Test case '{}' failed",
                test_case.name
            );
        }
    }

    #[test]
    fn test_namespaces_are_per_class() {
        let store = AttributeStore::new();
        store.namespace("a").set("host_attempts", 1).unwrap();
        store.namespace("b").set("host_attempts", 2).unwrap();
        assert_eq!(store.namespace("a").get_scalar("host_attempts").unwrap(), Some(json!(1)));
        assert_eq!(store.namespace("b").get_scalar("host_attempts").unwrap(), Some(json!(2)));
        assert_eq!(
            store.classes(),
            vec![ModuleClass::from("a"), ModuleClass::from("b")]
        );
    }

    #[test]
    fn test_reregistering_keeps_compatible_values() {
        let store = AttributeStore::new();
        store.register_class(
            "test",
            AttributeSchema::base()
                .with("keep", SlotKind::Scalar)
                .with("flip", SlotKind::Scalar),
        );
        let attrs = store.namespace("test");
        attrs.set("keep", "yes").unwrap();
        attrs.set("flip", "gone").unwrap();

        store.register_class(
            "test",
            AttributeSchema::base()
                .with("keep", SlotKind::Scalar)
                .with("flip", SlotKind::Sequence),
        );
        assert_eq!(attrs.get_scalar("keep").unwrap(), Some(json!("yes")));
        assert_eq!(attrs.get_sequence("flip").unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn test_lifecycle_policy_defaults_and_overrides() {
        let attrs = AttributeStore::new().namespace("test");
        assert_eq!(
            attrs.lifecycle_policy(LifecyclePhase::Abort).unwrap(),
            LifecyclePhase::Abort.default_policy()
        );

        attrs.set("abort_timeout", 2.5).unwrap();
        attrs.set("abort_attempts", 7).unwrap();
        assert_eq!(
            attrs.lifecycle_policy(LifecyclePhase::Abort).unwrap(),
            LifecyclePolicy {
                timeout: Duration::from_millis(2500),
                attempts: 7,
            }
        );
    }

    #[test]
    fn test_lifecycle_policy_rejects_garbage() {
        let attrs = AttributeStore::new().namespace("test");
        attrs.set("process_timeout", "soon").unwrap();
        assert!(matches!(
            attrs.lifecycle_policy(LifecyclePhase::Process),
            Err(AttributeError::InvalidValue { name, .. }) if name == "process_timeout"
        ));

        attrs.set("process_timeout", 1).unwrap();
        attrs.set("process_attempts", -1).unwrap();
        assert!(matches!(
            attrs.lifecycle_policy(LifecyclePhase::Process),
            Err(AttributeError::InvalidValue { name, .. }) if name == "process_attempts"
        ));
    }

    #[test]
    fn test_set_lifecycle_policy_round_trips() {
        let attrs = AttributeStore::new().namespace("test");
        let policy = LifecyclePolicy {
            timeout: Duration::from_secs(45),
            attempts: 2,
        };
        attrs.set_lifecycle_policy(LifecyclePhase::Host, policy).unwrap();
        assert_eq!(attrs.get_scalar("host_timeout").unwrap(), Some(json!(45)));
        assert_eq!(attrs.lifecycle_policy(LifecyclePhase::Host).unwrap(), policy);
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let attrs = store_with("xs", SlotKind::Sequence).namespace("test");
        attrs.push("xs", "kept").unwrap();
        attrs.set("host_attempts", 4).unwrap();

        let poisoner = attrs.clone();
        let outcome = std::thread::spawn(move || {
            poisoner.with_sequence::<()>("xs", |_| panic!("writer died holding the lock"))
        })
        .join();
        assert!(outcome.is_err());
        assert!(attrs.store.namespaces.is_poisoned());

        assert_eq!(attrs.get_sequence("xs").unwrap(), vec![json!("kept")]);
        assert_eq!(attrs.get_scalar("host_attempts").unwrap(), Some(json!(4)));
        attrs.set("host_attempts", 5).unwrap();
        attrs.push("xs", "after").unwrap();
        assert_eq!(attrs.get_scalar("host_attempts").unwrap(), Some(json!(5)));
        assert_eq!(
            attrs.get_sequence("xs").unwrap(),
            vec![json!("kept"), json!("after")]
        );
    }

    #[test]
    fn test_push_capped_drops_oldest() {
        let attrs = store_with("xs", SlotKind::Sequence).namespace("test");
        assert_eq!(attrs.push_capped("xs", 1, 2).unwrap(), 0);
        assert_eq!(attrs.push_capped("xs", 2, 2).unwrap(), 0);
        assert_eq!(attrs.push_capped("xs", 3, 2).unwrap(), 1);
        assert_eq!(attrs.get_sequence("xs").unwrap(), vec![json!(2), json!(3)]);

        attrs.put("xs", vec![json!(0), json!(1), json!(2), json!(3)]).unwrap();
        assert_eq!(attrs.push_capped("xs", 4, 2).unwrap(), 3);
        assert_eq!(attrs.get_sequence("xs").unwrap(), vec![json!(3), json!(4)]);
    }

    #[test]
    fn test_seed_from_config_writes_nothing_on_bad_attribute() {
        use crate::config::ModuleConfig;

        struct TestCase {
            name: &'static str,
            attribute: (&'static str, Value),
            expected: AttributeError,
        }

        let test_cases = vec![
            TestCase {
                name: "undeclared attribute",
                attribute: ("nope", json!(1)),
                expected: AttributeError::UnknownAttribute {
                    class: "second".to_string(),
                    name: "nope".to_string(),
                },
            },
            TestCase {
                name: "array for a scalar slot",
                attribute: ("x", json!([1, 2])),
                expected: AttributeError::KindMismatch {
                    name: "x".to_string(),
                    expected: SlotKind::Sequence,
                    actual: SlotKind::Scalar,
                },
            },
        ];

        for test_case in test_cases {
            let store = AttributeStore::new();
            store.register_class("first", AttributeSchema::base().with("xs", SlotKind::Sequence));
            store.register_class("second", AttributeSchema::base().with("x", SlotKind::Scalar));

            let mut first = ModuleConfig {
                class: "first".to_string(),
                ..Default::default()
            };
            first.attributes.insert("xs".to_string(), json!(["a"]));
            let mut second = ModuleConfig {
                class: "second".to_string(),
                ..Default::default()
            };
            let (name, value) = test_case.attribute;
            second.attributes.insert(name.to_string(), value);
            let config = DaemonConfig {
                modules: vec![first, second],
                ..Default::default()
            };

            assert_eq!(
                store.seed_from_config(&config).unwrap_err(),
                test_case.expected,
                "Test case '{}' failed",
                test_case.name
            );

            let first = store.namespace("first");
            assert_eq!(first.get_scalar("process_timeout").unwrap(), None, "Test case '{}'", test_case.name);
            assert!(first.get_sequence("xs").unwrap().is_empty(), "Test case '{}'", test_case.name);
            assert_eq!(
                store.namespace("second").get_scalar("process_attempts").unwrap(),
                None,
                "Test case '{}'",
                test_case.name
            );
        }
    }
}
