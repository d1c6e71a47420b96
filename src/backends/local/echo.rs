// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::attributes::{AttributeSchema, SlotKind};
use crate::errors::ModuleError;
use crate::module::{InstanceStorage, ModuleClass, ModuleInstance};
use crate::observability::messages::module::MessageReceived;
use crate::observability::messages::StructuredLog;
use crate::protocol::{Message, Tag};
use crate::traits::Module;
use crate::Value;

pub const ECHO_CLASS: &str = "echo";

/// How many tags `seen_tags` keeps when the instance config sets no
/// `seen_tags_limit`.
pub const DEFAULT_SEEN_TAGS_LIMIT: usize = 64;

fn seen_tags_limit(instance: &ModuleInstance) -> usize {
    instance
        .config()
        .get("seen_tags_limit")
        .and_then(Value::as_u64)
        .and_then(|limit| usize::try_from(limit).ok())
        .unwrap_or(DEFAULT_SEEN_TAGS_LIMIT)
}

/// Reference module: echoes every RECORD back on its resolved channel and
/// answers KEEPALIVE with KEEPALIVE. CONFIG payload is kept in storage and
/// must be at most two mappings (global, instance).
pub struct EchoModule;

impl EchoModule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for EchoModule {
    fn class(&self) -> ModuleClass {
        ModuleClass::from(ECHO_CLASS)
    }

    fn schema(&self) -> AttributeSchema {
        AttributeSchema::base()
            .with("seen_tags", SlotKind::Sequence)
            .with("last_record", SlotKind::Scalar)
    }

    fn daemonize(&self, _instance: &ModuleInstance) -> InstanceStorage {
        let mut storage = InstanceStorage::new();
        storage.insert("echoed", 0);
        storage
    }

    async fn initialize(
        &self,
        _instance: &ModuleInstance,
        storage: &mut InstanceStorage,
    ) -> Result<(), ModuleError> {
        storage.insert("initialized", true);
        Ok(())
    }

    async fn process(
        &self,
        instance: &ModuleInstance,
        storage: &mut InstanceStorage,
        message: Message,
    ) -> Result<(), ModuleError> {
        MessageReceived {
            class: instance.class().as_str(),
            tag: message.tag().as_str(),
            fields: message.payload().len(),
        }
        .log();
        instance
            .attributes()
            .push_capped("seen_tags", message.tag().as_str(), seen_tags_limit(instance))?;

        match message.tag() {
            Tag::Config => {
                if let Some(reason) = malformed_config(message.payload()) {
                    return Err(ModuleError::Failed {
                        class: instance.class().to_string(),
                        reason,
                    });
                }
                let mut fields = message.into_payload().into_iter();
                storage.insert("global_config", fields.next().unwrap_or_default());
                storage.insert("instance_config", fields.next().unwrap_or_default());
            }
            Tag::Record => {
                let record = Value::Array(message.into_payload());
                instance.attributes().set("last_record", record.clone())?;
                // Pass the record pre-built so a leading array field stays a field.
                instance.put_record(&[record], None)?;
                let echoed = storage.get("echoed").and_then(Value::as_u64).unwrap_or(0);
                storage.insert("echoed", echoed + 1);
            }
            Tag::Keepalive => instance.put_keepalive(None)?,
        }
        Ok(())
    }

    async fn cleanup(
        &self,
        _instance: &ModuleInstance,
        storage: &mut InstanceStorage,
    ) -> Result<(), ModuleError> {
        storage.remove("global_config");
        storage.remove("instance_config");
        Ok(())
    }
}

fn malformed_config(payload: &[Value]) -> Option<String> {
    if payload.len() > 2 {
        return Some(format!(
            "CONFIG carries {} fields, expected global and instance",
            payload.len()
        ));
    }
    payload
        .iter()
        .zip(["global", "instance"])
        .find(|(field, _)| !(field.is_object() || field.is_null()))
        .map(|(field, which)| format!("{} config must be a mapping, got {}", which, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeStore;
    use crate::backends::stub::RecordingBridge;
    use crate::channel::Channel;
    use crate::ConfigMap;
    use serde_json::json;
    use std::sync::Arc;

    fn child(bridge: Arc<RecordingBridge>) -> ModuleInstance {
        let store = AttributeStore::new();
        store.register_class(ECHO_CLASS, EchoModule.schema());
        let mut instance = ModuleInstance::instantiate(ECHO_CLASS, ConfigMap::new(), &store)
            .with_api(bridge);
        instance.assume_child_role("echo.up".into());
        instance
    }

    #[tokio::test]
    async fn test_record_is_echoed_verbatim() {
        let bridge = Arc::new(RecordingBridge::new());
        let instance = child(bridge.clone());
        let module = EchoModule::new();
        let mut storage = module.daemonize(&instance);

        let record = Message::new(Tag::Record, vec![json!([1, 2]), json!("tail")]);
        module
            .process(&instance, &mut storage, record.clone())
            .await
            .unwrap();

        let sent = bridge.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, Some(Channel::new("echo.up")));
        assert_eq!(sent[0].1, record);
        assert_eq!(storage.get("echoed"), Some(&json!(1)));
        assert_eq!(
            instance.attributes().get_scalar("last_record").unwrap(),
            Some(json!([[1, 2], "tail"]))
        );
    }

    #[tokio::test]
    async fn test_config_is_stored_not_echoed() {
        let bridge = Arc::new(RecordingBridge::new());
        let instance = child(bridge.clone());
        let module = EchoModule::new();
        let mut storage = module.daemonize(&instance);

        module.initialize(&instance, &mut storage).await.unwrap();
        module
            .process(
                &instance,
                &mut storage,
                Message::new(Tag::Config, vec![json!({"g": 1}), json!({"i": 2})]),
            )
            .await
            .unwrap();

        assert!(bridge.sent().is_empty());
        assert_eq!(storage.get("initialized"), Some(&json!(true)));
        assert_eq!(storage.get("global_config"), Some(&json!({"g": 1})));
        assert_eq!(storage.get("instance_config"), Some(&json!({"i": 2})));

        module.cleanup(&instance, &mut storage).await.unwrap();
        assert!(!storage.contains_key("global_config"));
    }

    #[tokio::test]
    async fn test_seen_tags_accumulate_in_order() {
        let bridge = Arc::new(RecordingBridge::new());
        let instance = child(bridge.clone());
        let module = EchoModule::new();
        let mut storage = module.daemonize(&instance);

        for msg in [
            Message::bare(Tag::Keepalive),
            Message::bare(Tag::Record),
            Message::bare(Tag::Keepalive),
        ] {
            module.process(&instance, &mut storage, msg).await.unwrap();
        }

        assert_eq!(
            instance.attributes().get_sequence("seen_tags").unwrap(),
            vec![json!("KEEPALIVE"), json!("RECORD"), json!("KEEPALIVE")]
        );
        let sent: Vec<Message> = bridge.sent().into_iter().map(|(_, m)| m).collect();
        assert_eq!(
            sent,
            vec![
                Message::bare(Tag::Keepalive),
                Message::bare(Tag::Record),
                Message::bare(Tag::Keepalive),
            ]
        );
    }

    #[tokio::test]
    async fn test_seen_tags_are_capped_by_instance_config() {
        let store = AttributeStore::new();
        store.register_class(ECHO_CLASS, EchoModule.schema());
        let mut config = ConfigMap::new();
        config.insert("seen_tags_limit".to_string(), json!(2));
        let bridge = Arc::new(RecordingBridge::new());
        let mut instance =
            ModuleInstance::instantiate(ECHO_CLASS, config, &store).with_api(bridge);
        instance.assume_child_role("echo.up".into());

        let module = EchoModule::new();
        let mut storage = module.daemonize(&instance);
        for msg in [
            Message::bare(Tag::Config),
            Message::bare(Tag::Record),
            Message::bare(Tag::Keepalive),
        ] {
            module.process(&instance, &mut storage, msg).await.unwrap();
        }

        assert_eq!(
            instance.attributes().get_sequence("seen_tags").unwrap(),
            vec![json!("RECORD"), json!("KEEPALIVE")]
        );
    }

    #[tokio::test]
    async fn test_seen_tags_default_cap() {
        let bridge = Arc::new(RecordingBridge::new());
        let instance = child(bridge);
        let module = EchoModule::new();
        let mut storage = module.daemonize(&instance);

        for _ in 0..DEFAULT_SEEN_TAGS_LIMIT + 10 {
            module
                .process(&instance, &mut storage, Message::bare(Tag::Keepalive))
                .await
                .unwrap();
        }

        assert_eq!(
            instance.attributes().get_sequence("seen_tags").unwrap().len(),
            DEFAULT_SEEN_TAGS_LIMIT
        );
    }

    #[tokio::test]
    async fn test_malformed_config_is_rejected_table_driven() {
        struct TestCase {
            name: &'static str,
            payload: Vec<Value>,
            reason: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "too many fields",
                payload: vec![json!({}), json!({}), json!({})],
                reason: "CONFIG carries 3 fields, expected global and instance",
            },
            TestCase {
                name: "global not a mapping",
                payload: vec![json!(["a"]), json!({})],
                reason: "global config must be a mapping, got [\"a\"]",
            },
            TestCase {
                name: "instance not a mapping",
                payload: vec![json!({}), json!(5)],
                reason: "instance config must be a mapping, got 5",
            },
        ];

        for test_case in test_cases {
            let bridge = Arc::new(RecordingBridge::new());
            let instance = child(bridge.clone());
            let module = EchoModule::new();
            let mut storage = module.daemonize(&instance);

            let err = module
                .process(
                    &instance,
                    &mut storage,
                    Message::new(Tag::Config, test_case.payload),
                )
                .await
                .unwrap_err();

            assert!(
                matches!(
                    &err,
                    ModuleError::Failed { class, reason }
                        if class == ECHO_CLASS && reason == test_case.reason
                ),
                "Test case '{}' failed: {}",
                test_case.name,
                err
            );
            assert!(!storage.contains_key("global_config"));
            assert!(bridge.sent().is_empty());
        }
    }
}
