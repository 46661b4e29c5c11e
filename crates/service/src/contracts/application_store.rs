use std::collections::BTreeMap;

use async_trait::async_trait;
use models::{Application, PropertyMap};
use tokio_util::sync::CancellationToken;

use crate::errors::StoreError;
use crate::storage::EntityStream;

/// Trait abstraction for client application storage.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn count(&self) -> Result<u64, StoreError>;
    async fn create(&self, application: Application) -> Result<(), StoreError>;
    async fn delete(&self, application: &Application) -> Result<(), StoreError>;
    async fn update(&self, application: Application) -> Result<(), StoreError>;
    async fn instantiate(&self) -> Result<Application, StoreError>;
    async fn list(
        &self,
        count: Option<usize>,
        offset: Option<usize>,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Application>, StoreError>;

    async fn find_by_id(&self, identifier: &str) -> Result<Option<Application>, StoreError>;
    async fn find_by_client_id(&self, identifier: &str) -> Result<Option<Application>, StoreError>;
    async fn find_by_redirect_uri(
        &self,
        address: &str,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Application>, StoreError>;
    async fn find_by_post_logout_redirect_uri(
        &self,
        address: &str,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Application>, StoreError>;

    async fn get_id(&self, application: &Application) -> Result<String, StoreError>;
    async fn get_client_id(&self, application: &Application) -> Result<String, StoreError>;
    async fn get_client_secret(&self, application: &Application) -> Result<String, StoreError>;
    async fn get_client_type(&self, application: &Application) -> Result<String, StoreError>;
    async fn get_consent_type(&self, application: &Application) -> Result<String, StoreError>;
    async fn get_display_name(&self, application: &Application) -> Result<String, StoreError>;
    async fn get_display_names(&self, application: &Application) -> Result<BTreeMap<String, String>, StoreError>;
    async fn get_permissions(&self, application: &Application) -> Result<Vec<String>, StoreError>;
    async fn get_redirect_uris(&self, application: &Application) -> Result<Vec<String>, StoreError>;
    async fn get_post_logout_redirect_uris(&self, application: &Application) -> Result<Vec<String>, StoreError>;
    async fn get_requirements(&self, application: &Application) -> Result<Vec<String>, StoreError>;
    async fn get_cors_domains(&self, application: &Application) -> Result<Vec<String>, StoreError>;
    async fn get_properties(&self, application: &Application) -> Result<PropertyMap, StoreError>;

    async fn set_client_id(&self, application: &mut Application, identifier: Option<&str>) -> Result<(), StoreError>;
    async fn set_client_secret(&self, application: &mut Application, secret: Option<&str>) -> Result<(), StoreError>;
    async fn set_client_type(&self, application: &mut Application, client_type: Option<&str>) -> Result<(), StoreError>;
    async fn set_consent_type(&self, application: &mut Application, consent_type: Option<&str>) -> Result<(), StoreError>;
    async fn set_display_name(&self, application: &mut Application, name: Option<&str>) -> Result<(), StoreError>;
    async fn set_display_names(&self, application: &mut Application, names: BTreeMap<String, String>) -> Result<(), StoreError>;
    async fn set_permissions(&self, application: &mut Application, permissions: &[String]) -> Result<(), StoreError>;
    async fn set_redirect_uris(&self, application: &mut Application, addresses: &[String]) -> Result<(), StoreError>;
    async fn set_post_logout_redirect_uris(&self, application: &mut Application, addresses: &[String]) -> Result<(), StoreError>;
    async fn set_requirements(&self, application: &mut Application, requirements: &[String]) -> Result<(), StoreError>;
    async fn set_cors_domains(&self, application: &mut Application, domains: &[String]) -> Result<(), StoreError>;
    async fn set_properties(&self, application: &mut Application, properties: &PropertyMap) -> Result<(), StoreError>;

    async fn validate_client_secret(&self, application: &Application, secret: &str) -> Result<bool, StoreError>;
}
