use std::collections::BTreeMap;

use async_trait::async_trait;
use models::{PropertyMap, Scope};
use tokio_util::sync::CancellationToken;

use crate::errors::StoreError;
use crate::storage::EntityStream;

/// Trait abstraction for scope storage.
#[async_trait]
pub trait ScopeStore: Send + Sync {
    async fn count(&self) -> Result<u64, StoreError>;
    async fn create(&self, scope: Scope) -> Result<(), StoreError>;
    async fn delete(&self, scope: &Scope) -> Result<(), StoreError>;
    async fn update(&self, scope: Scope) -> Result<(), StoreError>;
    async fn instantiate(&self) -> Result<Scope, StoreError>;
    async fn list(
        &self,
        count: Option<usize>,
        offset: Option<usize>,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Scope>, StoreError>;

    async fn find_by_id(&self, identifier: &str) -> Result<Option<Scope>, StoreError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Scope>, StoreError>;
    async fn find_by_names(&self, names: &[String], cancel: CancellationToken) -> Result<EntityStream<Scope>, StoreError>;
    async fn find_by_resource(&self, resource: &str, cancel: CancellationToken) -> Result<EntityStream<Scope>, StoreError>;

    async fn get_id(&self, scope: &Scope) -> Result<String, StoreError>;
    async fn get_name(&self, scope: &Scope) -> Result<String, StoreError>;
    async fn get_display_name(&self, scope: &Scope) -> Result<String, StoreError>;
    async fn get_display_names(&self, scope: &Scope) -> Result<BTreeMap<String, String>, StoreError>;
    async fn get_description(&self, scope: &Scope) -> Result<String, StoreError>;
    async fn get_descriptions(&self, scope: &Scope) -> Result<BTreeMap<String, String>, StoreError>;
    async fn get_resources(&self, scope: &Scope) -> Result<Vec<String>, StoreError>;
    async fn get_properties(&self, scope: &Scope) -> Result<PropertyMap, StoreError>;

    async fn set_name(&self, scope: &mut Scope, name: Option<&str>) -> Result<(), StoreError>;
    async fn set_display_name(&self, scope: &mut Scope, name: Option<&str>) -> Result<(), StoreError>;
    async fn set_display_names(&self, scope: &mut Scope, names: BTreeMap<String, String>) -> Result<(), StoreError>;
    async fn set_description(&self, scope: &mut Scope, description: Option<&str>) -> Result<(), StoreError>;
    async fn set_descriptions(&self, scope: &mut Scope, descriptions: BTreeMap<String, String>) -> Result<(), StoreError>;
    async fn set_resources(&self, scope: &mut Scope, resources: &[String]) -> Result<(), StoreError>;
    async fn set_properties(&self, scope: &mut Scope, properties: &PropertyMap) -> Result<(), StoreError>;
}
