use async_trait::async_trait;

use crate::attributes::AttributeSchema;
use crate::errors::ModuleError;
use crate::module::{InstanceStorage, ModuleClass, ModuleInstance};
use crate::protocol::Message;

/// Behaviour of a concrete worker module.
///
/// Only `class` is required. Every lifecycle hook defaults to doing nothing,
/// so a module implements just the phases it cares about. Timeouts and retry
/// counts for the phases live in the attribute store and are enforced by the
/// supervising controller, not here.
#[async_trait]
pub trait Module: Send + Sync {
    fn class(&self) -> ModuleClass;

    /// Slots this module reads and writes. Extend the base schema, never replace it.
    fn schema(&self) -> AttributeSchema {
        AttributeSchema::base()
    }

    /// Fresh runtime state for the child process.
    fn daemonize(&self, _instance: &ModuleInstance) -> InstanceStorage {
        InstanceStorage::default()
    }

    async fn initialize(
        &self,
        _instance: &ModuleInstance,
        _storage: &mut InstanceStorage,
    ) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn reinitialize(
        &self,
        instance: &ModuleInstance,
        storage: &mut InstanceStorage,
    ) -> Result<(), ModuleError> {
        self.initialize(instance, storage).await
    }

    async fn process(
        &self,
        _instance: &ModuleInstance,
        _storage: &mut InstanceStorage,
        _message: Message,
    ) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn abort(
        &self,
        _instance: &ModuleInstance,
        _storage: &mut InstanceStorage,
    ) -> Result<(), ModuleError> {
        Ok(())
    }

    async fn cleanup(
        &self,
        _instance: &ModuleInstance,
        _storage: &mut InstanceStorage,
    ) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Called when the child has been silent for longer than `host_timeout`.
    async fn host_timeout(
        &self,
        _instance: &ModuleInstance,
        _storage: &mut InstanceStorage,
    ) -> Result<(), ModuleError> {
        Ok(())
    }
}
