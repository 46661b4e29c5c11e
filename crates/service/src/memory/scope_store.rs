use std::collections::BTreeMap;

use async_trait::async_trait;
use models::{properties, PropertyMap, Scope};
use tokio_util::sync::CancellationToken;

use super::or_empty;
use crate::contracts::ScopeStore;
use crate::errors::{require_key, StoreError};
use crate::storage::{Collection, EntityStream};

/// Scope store over an in-memory collection seeded at startup. Read-only through the contract.
#[derive(Clone)]
pub struct MemoryScopeStore {
    scopes: Collection<Scope>,
}

impl MemoryScopeStore {
    pub fn new(scopes: Collection<Scope>) -> Self {
        Self { scopes }
    }

    pub fn collection(&self) -> &Collection<Scope> {
        &self.scopes
    }
}

#[async_trait]
impl ScopeStore for MemoryScopeStore {
    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.scopes.len().await as u64)
    }

    async fn create(&self, _scope: Scope) -> Result<(), StoreError> {
        Err(StoreError::not_supported("ScopeStore::create"))
    }

    async fn delete(&self, _scope: &Scope) -> Result<(), StoreError> {
        Err(StoreError::not_supported("ScopeStore::delete"))
    }

    async fn update(&self, _scope: Scope) -> Result<(), StoreError> {
        Err(StoreError::not_supported("ScopeStore::update"))
    }

    async fn instantiate(&self) -> Result<Scope, StoreError> {
        Ok(Scope::new())
    }

    async fn list(
        &self,
        _count: Option<usize>,
        _offset: Option<usize>,
        _cancel: CancellationToken,
    ) -> Result<EntityStream<Scope>, StoreError> {
        Err(StoreError::not_supported("ScopeStore::list"))
    }

    async fn find_by_id(&self, identifier: &str) -> Result<Option<Scope>, StoreError> {
        require_key(identifier, "identifier")?;
        Ok(self.scopes.find_by_id(identifier).await)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Scope>, StoreError> {
        require_key(name, "name")?;
        Ok(self.scopes.find(|scope| scope.name == name).await)
    }

    async fn find_by_names(&self, names: &[String], cancel: CancellationToken) -> Result<EntityStream<Scope>, StoreError> {
        if names.iter().any(String::is_empty) {
            return Err(StoreError::InvalidArgument { param: "names" });
        }
        let names = names.to_vec();
        Ok(self.scopes.filter(move |scope| names.contains(&scope.name), cancel))
    }

    async fn find_by_resource(&self, resource: &str, cancel: CancellationToken) -> Result<EntityStream<Scope>, StoreError> {
        require_key(resource, "resource")?;
        let resource = resource.to_owned();
        Ok(self
            .scopes
            .filter(move |scope| scope.resources.iter().any(|r| *r == resource), cancel))
    }

    async fn get_id(&self, scope: &Scope) -> Result<String, StoreError> {
        Ok(scope.id().to_owned())
    }

    async fn get_name(&self, scope: &Scope) -> Result<String, StoreError> {
        Ok(scope.name.clone())
    }

    async fn get_display_name(&self, scope: &Scope) -> Result<String, StoreError> {
        Ok(scope.display_name.clone())
    }

    async fn get_display_names(&self, scope: &Scope) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(scope.display_names.clone())
    }

    async fn get_description(&self, scope: &Scope) -> Result<String, StoreError> {
        Ok(scope.description.clone())
    }

    async fn get_descriptions(&self, scope: &Scope) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(scope.descriptions.clone())
    }

    async fn get_resources(&self, scope: &Scope) -> Result<Vec<String>, StoreError> {
        Ok(scope.resources.clone())
    }

    async fn get_properties(&self, scope: &Scope) -> Result<PropertyMap, StoreError> {
        Ok(properties::decode(scope.properties.as_deref())?)
    }

    async fn set_name(&self, scope: &mut Scope, name: Option<&str>) -> Result<(), StoreError> {
        scope.name = or_empty(name);
        Ok(())
    }

    async fn set_display_name(&self, scope: &mut Scope, name: Option<&str>) -> Result<(), StoreError> {
        scope.display_name = or_empty(name);
        Ok(())
    }

    async fn set_display_names(&self, scope: &mut Scope, names: BTreeMap<String, String>) -> Result<(), StoreError> {
        scope.display_names = names;
        Ok(())
    }

    async fn set_description(&self, scope: &mut Scope, description: Option<&str>) -> Result<(), StoreError> {
        scope.description = or_empty(description);
        Ok(())
    }

    async fn set_descriptions(&self, scope: &mut Scope, descriptions: BTreeMap<String, String>) -> Result<(), StoreError> {
        scope.descriptions = descriptions;
        Ok(())
    }

    async fn set_resources(&self, scope: &mut Scope, resources: &[String]) -> Result<(), StoreError> {
        scope.resources = resources.to_vec();
        Ok(())
    }

    async fn set_properties(&self, scope: &mut Scope, properties: &PropertyMap) -> Result<(), StoreError> {
        scope.properties = properties::encode(properties)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use serde_json::json;

    fn store_with(scopes: Vec<Scope>) -> MemoryScopeStore {
        MemoryScopeStore::new(Collection::from_vec(scopes))
    }

    #[tokio::test]
    async fn find_by_names_yields_only_stored_names() -> anyhow::Result<()> {
        let store = store_with(vec![Scope::named("api")?]);
        let names = vec!["api".to_string(), "email".to_string()];
        let found: Vec<Scope> = store.find_by_names(&names, CancellationToken::new()).await?.collect().await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "api");
        Ok(())
    }

    #[tokio::test]
    async fn find_by_names_rejects_blank_entries() -> anyhow::Result<()> {
        let store = store_with(vec![Scope::named("api")?]);
        let names = vec!["api".to_string(), String::new()];
        let err = store.find_by_names(&names, CancellationToken::new()).await.err();
        assert!(matches!(err, Some(StoreError::InvalidArgument { param: "names" })));
        Ok(())
    }

    #[tokio::test]
    async fn find_by_name_returns_first_inserted() -> anyhow::Result<()> {
        let mut shadow = Scope::with_id("api-2")?;
        shadow.name = "api".into();
        let store = store_with(vec![Scope::named("api")?, shadow]);
        let found = store.find_by_name("api").await?;
        assert_eq!(found.map(|s| s.id().to_string()), Some("api".into()));
        assert!(store.find_by_name("email").await?.is_none());
        assert!(store.find_by_id("api-2").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn find_by_resource_matches_any_listed_resource() -> anyhow::Result<()> {
        let mut api = Scope::named("api")?;
        api.resources = vec!["resource_server_1".into(), "resource_server_2".into()];
        let store = store_with(vec![api, Scope::named("email")?]);
        let found: Vec<Scope> = store
            .find_by_resource("resource_server_2", CancellationToken::new())
            .await?
            .collect()
            .await;
        assert_eq!(found.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn properties_go_through_the_blob() -> anyhow::Result<()> {
        let store = store_with(Vec::new());
        let mut scope = store.instantiate().await?;
        assert!(store.get_properties(&scope).await?.is_empty());

        let mut props = PropertyMap::new();
        props.insert("audience".into(), json!(["api"]));
        store.set_properties(&mut scope, &props).await?;
        assert_eq!(scope.properties.as_deref(), Some(r#"{"audience":["api"]}"#));
        assert_eq!(store.get_properties(&scope).await?, props);

        store.set_properties(&mut scope, &PropertyMap::new()).await?;
        assert!(scope.properties.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn mutations_through_the_contract_are_not_supported() -> anyhow::Result<()> {
        let store = store_with(vec![Scope::named("api")?]);
        let scope = Scope::named("email")?;
        assert!(matches!(store.create(scope.clone()).await, Err(StoreError::NotSupported { .. })));
        assert!(matches!(store.delete(&scope).await, Err(StoreError::NotSupported { .. })));
        assert!(matches!(store.update(scope).await, Err(StoreError::NotSupported { .. })));
        assert_eq!(store.count().await?, 1);
        Ok(())
    }
}
