use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{PropertyMap, Token};
use tokio_util::sync::CancellationToken;

use crate::errors::StoreError;
use crate::storage::EntityStream;

/// Trait abstraction for token storage.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn count(&self) -> Result<u64, StoreError>;
    async fn create(&self, token: Token) -> Result<(), StoreError>;
    async fn delete(&self, token: &Token) -> Result<(), StoreError>;
    /// Replace the stored token with the same Id, or add it when none exists.
    async fn update(&self, token: Token) -> Result<(), StoreError>;
    async fn instantiate(&self) -> Result<Token, StoreError>;
    async fn list(
        &self,
        count: Option<usize>,
        offset: Option<usize>,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Token>, StoreError>;
    /// Removal of stale entries; an extension point.
    async fn prune(&self, threshold: DateTime<Utc>) -> Result<u64, StoreError>;

    async fn find_by_id(&self, identifier: &str) -> Result<Option<Token>, StoreError>;
    async fn find_by_reference_id(&self, identifier: &str) -> Result<Option<Token>, StoreError>;
    async fn find_by_authorization_id(&self, identifier: &str, cancel: CancellationToken) -> Result<EntityStream<Token>, StoreError>;
    async fn find_by_application_id(&self, identifier: &str, cancel: CancellationToken) -> Result<EntityStream<Token>, StoreError>;
    async fn find_by_subject(&self, subject: &str, cancel: CancellationToken) -> Result<EntityStream<Token>, StoreError>;
    /// Tokens of `subject` for `client`, optionally narrowed by status and type.
    async fn find(
        &self,
        subject: &str,
        client: &str,
        status: Option<&str>,
        token_type: Option<&str>,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Token>, StoreError>;

    async fn get_id(&self, token: &Token) -> Result<String, StoreError>;
    async fn get_application_id(&self, token: &Token) -> Result<Option<String>, StoreError>;
    async fn get_authorization_id(&self, token: &Token) -> Result<Option<String>, StoreError>;
    async fn get_subject(&self, token: &Token) -> Result<String, StoreError>;
    async fn get_type(&self, token: &Token) -> Result<String, StoreError>;
    async fn get_status(&self, token: &Token) -> Result<String, StoreError>;
    async fn get_payload(&self, token: &Token) -> Result<String, StoreError>;
    async fn get_reference_id(&self, token: &Token) -> Result<String, StoreError>;
    async fn get_creation_date(&self, token: &Token) -> Result<Option<DateTime<Utc>>, StoreError>;
    async fn get_expiration_date(&self, token: &Token) -> Result<Option<DateTime<Utc>>, StoreError>;
    async fn get_redemption_date(&self, token: &Token) -> Result<Option<DateTime<Utc>>, StoreError>;
    async fn get_properties(&self, token: &Token) -> Result<PropertyMap, StoreError>;

    async fn set_application_id(&self, token: &mut Token, identifier: Option<&str>) -> Result<(), StoreError>;
    async fn set_authorization_id(&self, token: &mut Token, identifier: Option<&str>) -> Result<(), StoreError>;
    async fn set_subject(&self, token: &mut Token, subject: Option<&str>) -> Result<(), StoreError>;
    async fn set_type(&self, token: &mut Token, token_type: Option<&str>) -> Result<(), StoreError>;
    async fn set_status(&self, token: &mut Token, status: Option<&str>) -> Result<(), StoreError>;
    async fn set_payload(&self, token: &mut Token, payload: Option<&str>) -> Result<(), StoreError>;
    async fn set_reference_id(&self, token: &mut Token, identifier: Option<&str>) -> Result<(), StoreError>;
    async fn set_creation_date(&self, token: &mut Token, date: Option<DateTime<Utc>>) -> Result<(), StoreError>;
    async fn set_expiration_date(&self, token: &mut Token, date: Option<DateTime<Utc>>) -> Result<(), StoreError>;
    async fn set_redemption_date(&self, token: &mut Token, date: Option<DateTime<Utc>>) -> Result<(), StoreError>;
    async fn set_properties(&self, token: &mut Token, properties: &PropertyMap) -> Result<(), StoreError>;
}
