use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{properties, PropertyMap, Token};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::{non_empty, optional_key, or_empty, StoreOptions};
use crate::contracts::TokenStore;
use crate::errors::{require_key, StoreError};
use crate::storage::{EntityStream, JsonFileStore};

/// Token store backed by a [`JsonFileStore`].
///
/// Create, update and delete each rewrite the snapshot file. Update replaces the stored token
/// sharing the Id (or adds it), so applying the same update twice leaves one entry.
#[derive(Clone)]
pub struct MemoryTokenStore {
    store: JsonFileStore<Token>,
    options: StoreOptions,
}

impl MemoryTokenStore {
    pub fn new(store: JsonFileStore<Token>, options: StoreOptions) -> Self {
        Self { store, options }
    }

    pub fn backing(&self) -> &JsonFileStore<Token> {
        &self.store
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.store.collection().len().await as u64)
    }

    #[instrument(skip(self, token), fields(id = %token.id(), token_type = %token.token_type))]
    async fn create(&self, token: Token) -> Result<(), StoreError> {
        if let Err(e) = self.store.insert(token, self.options.duplicates).await {
            warn!(code = e.code(), error = %e, "token create failed");
            return Err(e);
        }
        debug!("token created");
        Ok(())
    }

    #[instrument(skip(self, token), fields(id = %token.id()))]
    async fn delete(&self, token: &Token) -> Result<(), StoreError> {
        let existed = self.store.remove(token.id()).await?;
        debug!(existed, "token deleted");
        Ok(())
    }

    #[instrument(skip(self, token), fields(id = %token.id(), status = %token.status))]
    async fn update(&self, token: Token) -> Result<(), StoreError> {
        let replaced = self.store.upsert(token).await?;
        debug!(replaced, "token updated");
        Ok(())
    }

    async fn instantiate(&self) -> Result<Token, StoreError> {
        Ok(Token::new())
    }

    async fn list(
        &self,
        _count: Option<usize>,
        _offset: Option<usize>,
        _cancel: CancellationToken,
    ) -> Result<EntityStream<Token>, StoreError> {
        Err(StoreError::not_supported("TokenStore::list"))
    }

    async fn prune(&self, _threshold: DateTime<Utc>) -> Result<u64, StoreError> {
        Err(StoreError::not_supported("TokenStore::prune"))
    }

    async fn find_by_id(&self, identifier: &str) -> Result<Option<Token>, StoreError> {
        require_key(identifier, "identifier")?;
        Ok(self.store.collection().find_by_id(identifier).await)
    }

    async fn find_by_reference_id(&self, identifier: &str) -> Result<Option<Token>, StoreError> {
        require_key(identifier, "identifier")?;
        Ok(self.store.collection().find(|token| token.reference_id == identifier).await)
    }

    async fn find_by_authorization_id(&self, identifier: &str, cancel: CancellationToken) -> Result<EntityStream<Token>, StoreError> {
        require_key(identifier, "identifier")?;
        let identifier = identifier.to_owned();
        Ok(self
            .store
            .collection()
            .filter(move |token| token.authorization_id == identifier, cancel))
    }

    async fn find_by_application_id(&self, identifier: &str, cancel: CancellationToken) -> Result<EntityStream<Token>, StoreError> {
        require_key(identifier, "identifier")?;
        let identifier = identifier.to_owned();
        Ok(self
            .store
            .collection()
            .filter(move |token| token.application_id == identifier, cancel))
    }

    async fn find_by_subject(&self, subject: &str, cancel: CancellationToken) -> Result<EntityStream<Token>, StoreError> {
        require_key(subject, "subject")?;
        let subject = subject.to_owned();
        Ok(self.store.collection().filter(move |token| token.subject == subject, cancel))
    }

    async fn find(
        &self,
        subject: &str,
        client: &str,
        status: Option<&str>,
        token_type: Option<&str>,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Token>, StoreError> {
        require_key(subject, "subject")?;
        require_key(client, "client")?;
        let status = optional_key(status, "status")?;
        let token_type = optional_key(token_type, "type")?;
        let (subject, client) = (subject.to_owned(), client.to_owned());

        Ok(self.store.collection().filter(
            move |token| {
                token.subject == subject
                    && token.application_id == client
                    && status.as_ref().map_or(true, |s| token.status == *s)
                    && token_type.as_ref().map_or(true, |t| token.token_type == *t)
            },
            cancel,
        ))
    }

    async fn get_id(&self, token: &Token) -> Result<String, StoreError> {
        Ok(token.id().to_owned())
    }

    async fn get_application_id(&self, token: &Token) -> Result<Option<String>, StoreError> {
        Ok(non_empty(&token.application_id))
    }

    async fn get_authorization_id(&self, token: &Token) -> Result<Option<String>, StoreError> {
        Ok(non_empty(&token.authorization_id))
    }

    async fn get_subject(&self, token: &Token) -> Result<String, StoreError> {
        Ok(token.subject.clone())
    }

    async fn get_type(&self, token: &Token) -> Result<String, StoreError> {
        Ok(token.token_type.clone())
    }

    async fn get_status(&self, token: &Token) -> Result<String, StoreError> {
        Ok(token.status.clone())
    }

    async fn get_payload(&self, token: &Token) -> Result<String, StoreError> {
        Ok(token.payload.clone())
    }

    async fn get_reference_id(&self, token: &Token) -> Result<String, StoreError> {
        Ok(token.reference_id.clone())
    }

    async fn get_creation_date(&self, token: &Token) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(token.creation_date)
    }

    async fn get_expiration_date(&self, token: &Token) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(token.expiration_date)
    }

    async fn get_redemption_date(&self, token: &Token) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(token.redemption_date)
    }

    async fn get_properties(&self, token: &Token) -> Result<PropertyMap, StoreError> {
        Ok(properties::decode(token.properties.as_deref())?)
    }

    async fn set_application_id(&self, token: &mut Token, identifier: Option<&str>) -> Result<(), StoreError> {
        token.application_id = or_empty(identifier);
        Ok(())
    }

    async fn set_authorization_id(&self, token: &mut Token, identifier: Option<&str>) -> Result<(), StoreError> {
        token.authorization_id = or_empty(identifier);
        Ok(())
    }

    async fn set_subject(&self, token: &mut Token, subject: Option<&str>) -> Result<(), StoreError> {
        token.subject = or_empty(subject);
        Ok(())
    }

    async fn set_type(&self, token: &mut Token, token_type: Option<&str>) -> Result<(), StoreError> {
        token.token_type = or_empty(token_type);
        Ok(())
    }

    async fn set_status(&self, token: &mut Token, status: Option<&str>) -> Result<(), StoreError> {
        token.status = or_empty(status);
        Ok(())
    }

    async fn set_payload(&self, token: &mut Token, payload: Option<&str>) -> Result<(), StoreError> {
        token.payload = or_empty(payload);
        Ok(())
    }

    async fn set_reference_id(&self, token: &mut Token, identifier: Option<&str>) -> Result<(), StoreError> {
        token.reference_id = or_empty(identifier);
        Ok(())
    }

    async fn set_creation_date(&self, token: &mut Token, date: Option<DateTime<Utc>>) -> Result<(), StoreError> {
        token.creation_date = date;
        Ok(())
    }

    async fn set_expiration_date(&self, token: &mut Token, date: Option<DateTime<Utc>>) -> Result<(), StoreError> {
        token.expiration_date = date;
        Ok(())
    }

    async fn set_redemption_date(&self, token: &mut Token, date: Option<DateTime<Utc>>) -> Result<(), StoreError> {
        token.redemption_date = date;
        Ok(())
    }

    async fn set_properties(&self, token: &mut Token, properties: &PropertyMap) -> Result<(), StoreError> {
        token.properties = properties::encode(properties)?;
        Ok(())
    }
}
