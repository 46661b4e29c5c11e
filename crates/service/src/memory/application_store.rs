use std::collections::BTreeMap;

use async_trait::async_trait;
use models::{Application, PropertyMap};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::{or_empty, StoreOptions};
use crate::contracts::ApplicationStore;
use crate::errors::{require_key, StoreError};
use crate::storage::{Collection, EntityStream};

/// Application store over an in-memory collection seeded at startup.
///
/// Applications are treated as configuration: they can be added and read, but update,
/// delete and property access are not offered.
#[derive(Clone)]
pub struct MemoryApplicationStore {
    applications: Collection<Application>,
    options: StoreOptions,
}

impl MemoryApplicationStore {
    pub fn new(applications: Collection<Application>, options: StoreOptions) -> Self {
        Self { applications, options }
    }

    pub fn collection(&self) -> &Collection<Application> {
        &self.applications
    }
}

#[async_trait]
impl ApplicationStore for MemoryApplicationStore {
    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.applications.len().await as u64)
    }

    #[instrument(skip(self, application), fields(id = %application.id(), client_id = %application.client_id))]
    async fn create(&self, application: Application) -> Result<(), StoreError> {
        self.applications
            .add_with(application, self.options.duplicates)
            .await
            .map_err(|rejected| {
                warn!("duplicate application id rejected");
                StoreError::Duplicate { id: rejected.id().to_string() }
            })?;
        debug!("application created");
        Ok(())
    }

    async fn delete(&self, _application: &Application) -> Result<(), StoreError> {
        Err(StoreError::not_supported("ApplicationStore::delete"))
    }

    async fn update(&self, _application: Application) -> Result<(), StoreError> {
        Err(StoreError::not_supported("ApplicationStore::update"))
    }

    async fn instantiate(&self) -> Result<Application, StoreError> {
        Ok(Application::new())
    }

    async fn list(
        &self,
        _count: Option<usize>,
        _offset: Option<usize>,
        _cancel: CancellationToken,
    ) -> Result<EntityStream<Application>, StoreError> {
        Err(StoreError::not_supported("ApplicationStore::list"))
    }

    async fn find_by_id(&self, identifier: &str) -> Result<Option<Application>, StoreError> {
        require_key(identifier, "identifier")?;
        Ok(self.applications.find_by_id(identifier).await)
    }

    async fn find_by_client_id(&self, identifier: &str) -> Result<Option<Application>, StoreError> {
        require_key(identifier, "identifier")?;
        Ok(self.applications.find(|app| app.client_id == identifier).await)
    }

    async fn find_by_redirect_uri(
        &self,
        address: &str,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Application>, StoreError> {
        require_key(address, "address")?;
        let address = address.to_owned();
        Ok(self
            .applications
            .filter(move |app| app.redirect_uris.iter().any(|uri| *uri == address), cancel))
    }

    async fn find_by_post_logout_redirect_uri(
        &self,
        address: &str,
        cancel: CancellationToken,
    ) -> Result<EntityStream<Application>, StoreError> {
        require_key(address, "address")?;
        let address = address.to_owned();
        Ok(self.applications.filter(
            move |app| app.post_logout_redirect_uris.iter().any(|uri| *uri == address),
            cancel,
        ))
    }

    async fn get_id(&self, application: &Application) -> Result<String, StoreError> {
        Ok(application.id().to_owned())
    }

    async fn get_client_id(&self, application: &Application) -> Result<String, StoreError> {
        Ok(application.client_id.clone())
    }

    async fn get_client_secret(&self, application: &Application) -> Result<String, StoreError> {
        Ok(application.client_secret.clone())
    }

    async fn get_client_type(&self, application: &Application) -> Result<String, StoreError> {
        Ok(application.client_type.clone())
    }

    async fn get_consent_type(&self, application: &Application) -> Result<String, StoreError> {
        Ok(application.consent_type.clone())
    }

    async fn get_display_name(&self, application: &Application) -> Result<String, StoreError> {
        Ok(application.display_name.clone())
    }

    async fn get_display_names(&self, application: &Application) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(application.display_names.clone())
    }

    async fn get_permissions(&self, application: &Application) -> Result<Vec<String>, StoreError> {
        Ok(application.permissions.clone())
    }

    async fn get_redirect_uris(&self, application: &Application) -> Result<Vec<String>, StoreError> {
        Ok(application.redirect_uris.clone())
    }

    async fn get_post_logout_redirect_uris(&self, application: &Application) -> Result<Vec<String>, StoreError> {
        Ok(application.post_logout_redirect_uris.clone())
    }

    async fn get_requirements(&self, application: &Application) -> Result<Vec<String>, StoreError> {
        Ok(application.requirements.clone())
    }

    async fn get_cors_domains(&self, application: &Application) -> Result<Vec<String>, StoreError> {
        Ok(application.cors_domains.clone())
    }

    async fn get_properties(&self, _application: &Application) -> Result<PropertyMap, StoreError> {
        Err(StoreError::not_supported("ApplicationStore::get_properties"))
    }

    async fn set_client_id(&self, application: &mut Application, identifier: Option<&str>) -> Result<(), StoreError> {
        application.client_id = or_empty(identifier);
        Ok(())
    }

    async fn set_client_secret(&self, application: &mut Application, secret: Option<&str>) -> Result<(), StoreError> {
        application.client_secret = or_empty(secret);
        Ok(())
    }

    async fn set_client_type(&self, application: &mut Application, client_type: Option<&str>) -> Result<(), StoreError> {
        application.client_type = or_empty(client_type);
        Ok(())
    }

    async fn set_consent_type(&self, application: &mut Application, consent_type: Option<&str>) -> Result<(), StoreError> {
        application.consent_type = or_empty(consent_type);
        Ok(())
    }

    async fn set_display_name(&self, application: &mut Application, name: Option<&str>) -> Result<(), StoreError> {
        application.display_name = or_empty(name);
        Ok(())
    }

    async fn set_display_names(&self, application: &mut Application, names: BTreeMap<String, String>) -> Result<(), StoreError> {
        application.display_names = names;
        Ok(())
    }

    async fn set_permissions(&self, application: &mut Application, permissions: &[String]) -> Result<(), StoreError> {
        application.permissions = permissions.to_vec();
        Ok(())
    }

    async fn set_redirect_uris(&self, application: &mut Application, addresses: &[String]) -> Result<(), StoreError> {
        application.redirect_uris = addresses.to_vec();
        Ok(())
    }

    async fn set_post_logout_redirect_uris(&self, application: &mut Application, addresses: &[String]) -> Result<(), StoreError> {
        application.post_logout_redirect_uris = addresses.to_vec();
        Ok(())
    }

    async fn set_requirements(&self, application: &mut Application, requirements: &[String]) -> Result<(), StoreError> {
        application.requirements = requirements.to_vec();
        Ok(())
    }

    async fn set_cors_domains(&self, application: &mut Application, domains: &[String]) -> Result<(), StoreError> {
        application.cors_domains = domains.to_vec();
        Ok(())
    }

    async fn set_properties(&self, _application: &mut Application, _properties: &PropertyMap) -> Result<(), StoreError> {
        Err(StoreError::not_supported("ApplicationStore::set_properties"))
    }

    async fn validate_client_secret(&self, _application: &Application, _secret: &str) -> Result<bool, StoreError> {
        Err(StoreError::not_supported("ApplicationStore::validate_client_secret"))
    }
}
