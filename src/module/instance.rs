// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::api;
use crate::attributes::{
    dispatch, AttributeStore, AttributeValue, Attributes, LifecyclePhase, LifecyclePolicy,
};
use crate::channel::{resolve_channel, Channel, Role};
use crate::config::ModuleConfig;
use crate::errors::{ApiError, AttributeError, ModuleError};
use crate::module::ModuleClass;
use crate::observability::messages::module::{ApiUnavailable, MessageSent, RoleAttached};
use crate::observability::messages::StructuredLog;
use crate::protocol::{build_keepalive, build_message, build_record, Message, Tag};
use crate::traits::ApiBridge;
use crate::{ConfigMap, Value};
use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Mutable runtime state a module keeps inside its child process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceStorage(HashMap<String, Value>);

impl InstanceStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One module instance handle, in either the main process or its child.
///
/// The configuration mapping given at construction is the instance's own
/// state. Class-wide settings live in the shared [`AttributeStore`] that is
/// injected here, and the [`Role`] decides which channel messages go out on.
///
/// ```
/// use modcore::attributes::AttributeStore;
/// use modcore::channel::Role;
/// use modcore::module::ModuleInstance;
/// use serde_json::{json, Map};
///
/// let store = AttributeStore::new();
/// let mut config = Map::new();
/// config.insert("a".to_string(), json!(1));
///
/// let mut instance = ModuleInstance::instantiate("echo", config, &store);
/// assert_eq!(instance.role(), &Role::Unassigned);
/// assert!(instance.channel().is_none());
///
/// instance.assume_child_role("ch".into());
/// assert_eq!(instance.channel().map(|c| c.name()), Some("ch"));
/// assert_eq!(instance.config().get("a"), Some(&json!(1)));
/// ```
pub struct ModuleInstance {
    class: ModuleClass,
    config: ConfigMap,
    role: Role,
    attributes: Attributes,
    api: Option<Arc<dyn ApiBridge>>,
}

impl ModuleInstance {
    /// Wrap a configuration mapping as a new instance of `class`. No validation.
    pub fn instantiate(
        class: impl Into<ModuleClass>,
        config: ConfigMap,
        store: &AttributeStore,
    ) -> Self {
        let class = class.into();
        Self {
            attributes: store.namespace(class.clone()),
            class,
            config,
            role: Role::Unassigned,
            api: None,
        }
    }

    pub fn from_config(module: &ModuleConfig, store: &AttributeStore) -> Self {
        Self::instantiate(module.class.as_str(), module.options.clone(), store)
    }

    /// Use this bridge instead of the process-global one.
    pub fn with_api(mut self, api: Arc<dyn ApiBridge>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn class(&self) -> &ModuleClass {
        &self.class
    }

    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Replace the role, returning the previous one.
    pub fn attach_role(&mut self, role: Role) -> Role {
        RoleAttached {
            class: self.class.as_str(),
            role: role.name(),
            channel: resolve_channel(&role).map(Channel::name),
        }
        .log();
        std::mem::replace(&mut self.role, role)
    }

    /// This handle lives in the main process and stands for a forked child.
    pub fn assume_main_role(&mut self, channel: Channel) -> Role {
        self.attach_role(Role::Main { channel })
    }

    /// This handle lives inside the child itself.
    pub fn assume_child_role(&mut self, channel: Channel) -> Role {
        self.attach_role(Role::Child { channel })
    }

    pub fn detach_role(&mut self) -> Role {
        std::mem::take(&mut self.role)
    }

    /// Default endpoint for outgoing messages.
    pub fn channel(&self) -> Option<&Channel> {
        resolve_channel(&self.role)
    }

    /// The bridge to talk through: the injected one, else the process-global one.
    pub fn api(&self) -> Option<Arc<dyn ApiBridge>> {
        self.api.clone().or_else(api::current)
    }

    /// Send the global and instance configuration as the two CONFIG fields.
    ///
    /// Both blobs are always sent as given, whatever their shape.
    pub fn put_config(
        &self,
        global: Value,
        instance: Value,
        channel: Option<&Channel>,
    ) -> Result<(), ModuleError> {
        self.send(build_message(Tag::Config, vec![global, instance]), channel)
    }

    pub fn put_record(&self, record: &[Value], channel: Option<&Channel>) -> Result<(), ModuleError> {
        self.send(build_record(record), channel)
    }

    pub fn put_keepalive(&self, channel: Option<&Channel>) -> Result<(), ModuleError> {
        self.send(build_keepalive(), channel)
    }

    fn send(&self, message: Message, channel: Option<&Channel>) -> Result<(), ModuleError> {
        let Some(api) = self.api() else {
            ApiUnavailable {
                class: self.class.as_str(),
                tag: message.tag().as_str(),
            }
            .log();
            return Err(ApiError::Unavailable.into());
        };
        let target = channel.or_else(|| self.channel());
        api.put_args(target, &message)?;
        MessageSent {
            class: self.class.as_str(),
            tag: message.tag().as_str(),
            fields: message.payload().len(),
            channel: target.map(Channel::name),
        }
        .log();
        Ok(())
    }

    /// Fail-soft `<op>_<name>` accessor against this class's attributes.
    ///
    /// Misuse is logged with the caller's location and yields `None`.
    #[track_caller]
    pub fn call_accessor(&self, call: &str, args: Vec<Value>) -> Option<AttributeValue> {
        let caller = Location::caller();
        let api = self.api();
        dispatch(&self.attributes, api.as_deref(), call, args, caller)
    }

    pub fn lifecycle_policy(&self, phase: LifecyclePhase) -> Result<LifecyclePolicy, AttributeError> {
        self.attributes.lifecycle_policy(phase)
    }
}

impl fmt::Debug for ModuleInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleInstance")
            .field("class", &self.class)
            .field("config_keys", &self.config.keys().collect::<Vec<_>>())
            .field("role", &self.role)
            .field("has_api", &self.api.is_some())
            .finish()
    }
}
