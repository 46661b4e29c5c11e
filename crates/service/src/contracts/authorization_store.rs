use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{Authorization, PropertyMap};
use tokio_util::sync::CancellationToken;

use crate::errors::StoreError;
use crate::storage::EntityStream;

/// Trait abstraction for authorization (consent grant) storage.
#[async_trait]
pub trait AuthorizationStore: Send + Sync {
    async fn count(&self) -> Result<u64, StoreError>;
    async fn create(&self, authorization: Authorization) -> Result<(), StoreError>;
    async fn delete(&self, authorization: &Authorization) -> Result<(), StoreError>;
    async fn update(&self, authorization: Authorization) -> Result<(), StoreError>;
    async fn instantiate(&self) -> Result<Authorization, StoreError>;
    async fn list(
        &self,
        count: Option<usize>,
        offset: Option<usize>,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Authorization>, StoreError>;
    /// Removal of stale entries; an extension point.
    async fn prune(&self, threshold: DateTime<Utc>) -> Result<u64, StoreError>;

    async fn find_by_id(&self, identifier: &str) -> Result<Option<Authorization>, StoreError>;
    async fn find_by_subject(&self, subject: &str, cancel: CancellationToken) -> Result<EntityStream<Authorization>, StoreError>;
    async fn find_by_application_id(&self, identifier: &str, cancel: CancellationToken) -> Result<EntityStream<Authorization>, StoreError>;
    /// Authorizations of `subject` for `client`, optionally narrowed by status and type.
    async fn find(
        &self,
        subject: &str,
        client: &str,
        status: Option<&str>,
        authorization_type: Option<&str>,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Authorization>, StoreError>;

    async fn get_id(&self, authorization: &Authorization) -> Result<String, StoreError>;
    async fn get_application_id(&self, authorization: &Authorization) -> Result<Option<String>, StoreError>;
    async fn get_subject(&self, authorization: &Authorization) -> Result<String, StoreError>;
    async fn get_type(&self, authorization: &Authorization) -> Result<String, StoreError>;
    async fn get_status(&self, authorization: &Authorization) -> Result<String, StoreError>;
    async fn get_scopes(&self, authorization: &Authorization) -> Result<Vec<String>, StoreError>;
    async fn get_creation_date(&self, authorization: &Authorization) -> Result<Option<DateTime<Utc>>, StoreError>;
    async fn get_properties(&self, authorization: &Authorization) -> Result<PropertyMap, StoreError>;

    async fn set_application_id(&self, authorization: &mut Authorization, identifier: Option<&str>) -> Result<(), StoreError>;
    async fn set_subject(&self, authorization: &mut Authorization, subject: Option<&str>) -> Result<(), StoreError>;
    async fn set_type(&self, authorization: &mut Authorization, authorization_type: Option<&str>) -> Result<(), StoreError>;
    async fn set_status(&self, authorization: &mut Authorization, status: Option<&str>) -> Result<(), StoreError>;
    async fn set_scopes(&self, authorization: &mut Authorization, scopes: &[String]) -> Result<(), StoreError>;
    async fn set_creation_date(&self, authorization: &mut Authorization, date: Option<DateTime<Utc>>) -> Result<(), StoreError>;
    async fn set_properties(&self, authorization: &mut Authorization, properties: &PropertyMap) -> Result<(), StoreError>;
}
