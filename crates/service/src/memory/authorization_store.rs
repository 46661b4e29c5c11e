use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{properties, Authorization, PropertyMap};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::{non_empty, optional_key, or_empty, StoreOptions};
use crate::contracts::AuthorizationStore;
use crate::errors::{require_key, StoreError};
use crate::storage::{EntityStream, JsonFileStore};

/// Authorization store backed by a [`JsonFileStore`]; every create rewrites the snapshot.
#[derive(Clone)]
pub struct MemoryAuthorizationStore {
    store: JsonFileStore<Authorization>,
    options: StoreOptions,
}

impl MemoryAuthorizationStore {
    pub fn new(store: JsonFileStore<Authorization>, options: StoreOptions) -> Self {
        Self { store, options }
    }

    pub fn backing(&self) -> &JsonFileStore<Authorization> {
        &self.store
    }
}

#[async_trait]
impl AuthorizationStore for MemoryAuthorizationStore {
    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.store.collection().len().await as u64)
    }

    #[instrument(skip(self, authorization), fields(id = %authorization.id(), subject = %authorization.subject))]
    async fn create(&self, authorization: Authorization) -> Result<(), StoreError> {
        if let Err(e) = self.store.insert(authorization, self.options.duplicates).await {
            warn!(code = e.code(), error = %e, "authorization create failed");
            return Err(e);
        }
        debug!("authorization created");
        Ok(())
    }

    async fn delete(&self, _authorization: &Authorization) -> Result<(), StoreError> {
        Err(StoreError::not_supported("AuthorizationStore::delete"))
    }

    async fn update(&self, _authorization: Authorization) -> Result<(), StoreError> {
        Err(StoreError::not_supported("AuthorizationStore::update"))
    }

    async fn instantiate(&self) -> Result<Authorization, StoreError> {
        Ok(Authorization::new())
    }

    async fn list(
        &self,
        _count: Option<usize>,
        _offset: Option<usize>,
        _cancel: CancellationToken,
    ) -> Result<EntityStream<Authorization>, StoreError> {
        Err(StoreError::not_supported("AuthorizationStore::list"))
    }

    async fn prune(&self, _threshold: DateTime<Utc>) -> Result<u64, StoreError> {
        Err(StoreError::not_supported("AuthorizationStore::prune"))
    }

    async fn find_by_id(&self, identifier: &str) -> Result<Option<Authorization>, StoreError> {
        require_key(identifier, "identifier")?;
        Ok(self.store.collection().find_by_id(identifier).await)
    }

    async fn find_by_subject(&self, subject: &str, cancel: CancellationToken) -> Result<EntityStream<Authorization>, StoreError> {
        require_key(subject, "subject")?;
        let subject = subject.to_owned();
        Ok(self.store.collection().filter(move |auth| auth.subject == subject, cancel))
    }

    async fn find_by_application_id(
        &self,
        identifier: &str,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Authorization>, StoreError> {
        require_key(identifier, "identifier")?;
        let identifier = identifier.to_owned();
        Ok(self
            .store
            .collection()
            .filter(move |auth| auth.application_id == identifier, cancel))
    }

    async fn find(
        &self,
        subject: &str,
        client: &str,
        status: Option<&str>,
        authorization_type: Option<&str>,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Authorization>, StoreError> {
        require_key(subject, "subject")?;
        require_key(client, "client")?;
        let status = optional_key(status, "status")?;
        let authorization_type = optional_key(authorization_type, "type")?;
        let (subject, client) = (subject.to_owned(), client.to_owned());

        Ok(self.store.collection().filter(
            move |auth| {
                auth.subject == subject
                    && auth.application_id == client
                    && status.as_ref().map_or(true, |s| auth.status == *s)
                    && authorization_type.as_ref().map_or(true, |t| auth.authorization_type == *t)
            },
            cancel,
        ))
    }

    async fn get_id(&self, authorization: &Authorization) -> Result<String, StoreError> {
        Ok(authorization.id().to_owned())
    }

    async fn get_application_id(&self, authorization: &Authorization) -> Result<Option<String>, StoreError> {
        Ok(non_empty(&authorization.application_id))
    }

    async fn get_subject(&self, authorization: &Authorization) -> Result<String, StoreError> {
        Ok(authorization.subject.clone())
    }

    async fn get_type(&self, authorization: &Authorization) -> Result<String, StoreError> {
        Ok(authorization.authorization_type.clone())
    }

    async fn get_status(&self, authorization: &Authorization) -> Result<String, StoreError> {
        Ok(authorization.status.clone())
    }

    async fn get_scopes(&self, authorization: &Authorization) -> Result<Vec<String>, StoreError> {
        Ok(authorization.scopes.clone())
    }

    async fn get_creation_date(&self, authorization: &Authorization) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(authorization.creation_date)
    }

    async fn get_properties(&self, authorization: &Authorization) -> Result<PropertyMap, StoreError> {
        Ok(properties::decode(authorization.properties.as_deref())?)
    }

    async fn set_application_id(&self, authorization: &mut Authorization, identifier: Option<&str>) -> Result<(), StoreError> {
        authorization.application_id = or_empty(identifier);
        Ok(())
    }

    async fn set_subject(&self, authorization: &mut Authorization, subject: Option<&str>) -> Result<(), StoreError> {
        authorization.subject = or_empty(subject);
        Ok(())
    }

    async fn set_type(&self, authorization: &mut Authorization, authorization_type: Option<&str>) -> Result<(), StoreError> {
        authorization.authorization_type = or_empty(authorization_type);
        Ok(())
    }

    async fn set_status(&self, authorization: &mut Authorization, status: Option<&str>) -> Result<(), StoreError> {
        authorization.status = or_empty(status);
        Ok(())
    }

    async fn set_scopes(&self, authorization: &mut Authorization, scopes: &[String]) -> Result<(), StoreError> {
        authorization.scopes = scopes.to_vec();
        Ok(())
    }

    async fn set_creation_date(&self, authorization: &mut Authorization, date: Option<DateTime<Utc>>) -> Result<(), StoreError> {
        authorization.creation_date = date;
        Ok(())
    }

    async fn set_properties(&self, authorization: &mut Authorization, properties: &PropertyMap) -> Result<(), StoreError> {
        authorization.properties = properties::encode(properties)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use serde_json::json;
    use std::path::PathBuf;

    fn tmp_file() -> PathBuf {
        std::env::temp_dir().join(format!("authorization_store_{}.json", uuid::Uuid::new_v4()))
    }

    async fn granted(store: &MemoryAuthorizationStore, subject: &str, client: &str, status: &str) -> anyhow::Result<Authorization> {
        let mut auth = store.instantiate().await?;
        store.set_subject(&mut auth, Some(subject)).await?;
        store.set_application_id(&mut auth, Some(client)).await?;
        store.set_status(&mut auth, Some(status)).await?;
        store.set_type(&mut auth, Some("permanent")).await?;
        store.set_scopes(&mut auth, &["api".to_string()]).await?;
        store.set_creation_date(&mut auth, Some(Utc::now())).await?;
        store.create(auth.clone()).await?;
        Ok(auth)
    }

    #[tokio::test]
    async fn create_then_find_by_id_returns_equal_entity() -> anyhow::Result<()> {
        let store = MemoryAuthorizationStore::new(JsonFileStore::in_memory(), StoreOptions::default());
        let auth = granted(&store, "alice", "console", "valid").await?;
        assert_eq!(store.find_by_id(auth.id()).await?, Some(auth));
        assert_eq!(store.count().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn create_persists_to_the_snapshot() -> anyhow::Result<()> {
        let path = tmp_file();
        let store = MemoryAuthorizationStore::new(JsonFileStore::open(Some(&path)).await?, StoreOptions::default());
        let auth = granted(&store, "alice", "console", "valid").await?;

        let reopened = JsonFileStore::<Authorization>::open(Some(&path)).await?;
        assert_eq!(reopened.collection().snapshot().await, vec![auth]);
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn find_narrows_by_status_and_type() -> anyhow::Result<()> {
        let store = MemoryAuthorizationStore::new(JsonFileStore::in_memory(), StoreOptions::default());
        granted(&store, "alice", "console", "valid").await?;
        granted(&store, "alice", "console", "revoked").await?;
        granted(&store, "alice", "desktopapp", "valid").await?;
        granted(&store, "bob", "console", "valid").await?;

        let all: Vec<Authorization> = store
            .find("alice", "console", None, None, CancellationToken::new())
            .await?
            .collect()
            .await;
        assert_eq!(all.len(), 2);

        let valid: Vec<Authorization> = store
            .find("alice", "console", Some("valid"), Some("permanent"), CancellationToken::new())
            .await?
            .collect()
            .await;
        assert_eq!(valid.len(), 1);

        let adhoc: Vec<Authorization> = store
            .find("alice", "console", None, Some("ad-hoc"), CancellationToken::new())
            .await?
            .collect()
            .await;
        assert!(adhoc.is_empty());

        let err = store.find("alice", "console", Some(""), None, CancellationToken::new()).await.err();
        assert!(matches!(err, Some(StoreError::InvalidArgument { param: "status" })));
        Ok(())
    }

    #[tokio::test]
    async fn subject_and_application_streams() -> anyhow::Result<()> {
        let store = MemoryAuthorizationStore::new(JsonFileStore::in_memory(), StoreOptions::default());
        granted(&store, "alice", "console", "valid").await?;
        granted(&store, "bob", "console", "valid").await?;

        let by_subject: Vec<Authorization> =
            store.find_by_subject("alice", CancellationToken::new()).await?.collect().await;
        assert_eq!(by_subject.len(), 1);
        let by_app: Vec<Authorization> = store
            .find_by_application_id("console", CancellationToken::new())
            .await?
            .collect()
            .await;
        assert_eq!(by_app.len(), 2);
        assert!(store.find_by_subject("", CancellationToken::new()).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn empty_application_id_reads_as_none_and_dates_clear() -> anyhow::Result<()> {
        let store = MemoryAuthorizationStore::new(JsonFileStore::in_memory(), StoreOptions::default());
        let mut auth = store.instantiate().await?;
        assert_eq!(store.get_application_id(&auth).await?, None);
        store.set_application_id(&mut auth, Some("console")).await?;
        assert_eq!(store.get_application_id(&auth).await?.as_deref(), Some("console"));

        store.set_creation_date(&mut auth, Some(Utc::now())).await?;
        store.set_creation_date(&mut auth, None).await?;
        assert!(store.get_creation_date(&auth).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn properties_round_trip_and_bad_blob_is_codec_error() -> anyhow::Result<()> {
        let store = MemoryAuthorizationStore::new(JsonFileStore::in_memory(), StoreOptions::default());
        let mut auth = store.instantiate().await?;
        let mut props = PropertyMap::new();
        props.insert("nonce".into(), json!("abc"));
        props.insert("max_age".into(), json!(300));
        store.set_properties(&mut auth, &props).await?;
        assert_eq!(store.get_properties(&auth).await?, props);

        auth.properties = Some("[1,2]".into());
        let err = store.get_properties(&auth).await.unwrap_err();
        assert_eq!(err.code(), 2200);
        Ok(())
    }

    #[tokio::test]
    async fn unsupported_mutations() -> anyhow::Result<()> {
        let store = MemoryAuthorizationStore::new(JsonFileStore::in_memory(), StoreOptions::default());
        let auth = granted(&store, "alice", "console", "valid").await?;
        assert!(matches!(store.delete(&auth).await, Err(StoreError::NotSupported { .. })));
        assert!(matches!(store.update(auth).await, Err(StoreError::NotSupported { .. })));
        assert!(matches!(store.prune(Utc::now()).await, Err(StoreError::NotSupported { .. })));
        assert_eq!(store.count().await?, 1);
        Ok(())
    }
}
