//! Wiring of the four store facades from storage configuration.

use std::sync::Arc;

use configs::StorageConfig;
use models::{Authorization, Token};
use tracing::info;

use crate::bootstrap;
use crate::errors::StoreError;
use crate::memory::{
    MemoryApplicationStore, MemoryAuthorizationStore, MemoryScopeStore, MemoryTokenStore, StoreOptions,
};
use crate::storage::{Collection, JsonFileStore};

/// The store set an authorization server is started with.
#[derive(Clone)]
pub struct Stores {
    pub applications: Arc<MemoryApplicationStore>,
    pub scopes: Arc<MemoryScopeStore>,
    pub authorizations: Arc<MemoryAuthorizationStore>,
    pub tokens: Arc<MemoryTokenStore>,
}

impl Stores {
    /// Seed applications and scopes, then load authorizations and tokens from their files.
    pub async fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        let options = StoreOptions::rejecting_duplicates(config.reject_duplicate_ids);

        let applications = bootstrap::applications_from(config.applications_file.as_deref()).await?;
        let scopes = bootstrap::scopes_from(config.scopes_file.as_deref()).await?;
        let authorizations = JsonFileStore::<Authorization>::open(config.authorization_file.clone()).await?;
        let tokens = JsonFileStore::<Token>::open(config.token_file.clone()).await?;

        info!(
            service = "stores",
            event = "opened",
            applications = applications.len(),
            scopes = scopes.len(),
            authorizations = authorizations.collection().len().await,
            tokens = tokens.collection().len().await,
            persistent = config.authorization_file.is_some() || config.token_file.is_some(),
            "stores ready"
        );

        Ok(Self {
            applications: Arc::new(MemoryApplicationStore::new(Collection::from_vec(applications), options)),
            scopes: Arc::new(MemoryScopeStore::new(Collection::from_vec(scopes))),
            authorizations: Arc::new(MemoryAuthorizationStore::new(authorizations, options)),
            tokens: Arc::new(MemoryTokenStore::new(tokens, options)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{ApplicationStore, ScopeStore, TokenStore};

    #[tokio::test]
    async fn default_config_is_seeded_and_memory_only() -> anyhow::Result<()> {
        let stores = Stores::open(&StorageConfig::default()).await?;
        assert_eq!(stores.applications.count().await?, 2);
        assert_eq!(stores.scopes.count().await?, 1);
        assert_eq!(stores.tokens.count().await?, 0);
        assert!(stores.tokens.backing().file_path().is_none());
        assert!(stores.authorizations.backing().file_path().is_none());
        Ok(())
    }
}
