//! One-shot loading of read-mostly configuration entities.
//!
//! Applications and scopes are seeded once at startup, either from a JSON array file or from a
//! built-in sample, and are never written back.

use std::path::Path;

use models::{Application, Scope};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::errors::StoreError;

pub mod permissions {
    pub const ENDPOINT_AUTHORIZATION: &str = "ept:authorization";
    pub const ENDPOINT_TOKEN: &str = "ept:token";
    pub const GRANT_AUTHORIZATION_CODE: &str = "gt:authorization_code";
    pub const GRANT_CLIENT_CREDENTIALS: &str = "gt:client_credentials";
    pub const GRANT_REFRESH_TOKEN: &str = "gt:refresh_token";
    pub const RESPONSE_TYPE_CODE: &str = "rst:code";
    pub const SCOPE_PREFIX: &str = "scp:";
}

async fn load_array<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>, StoreError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| StoreError::durability(path, "read", e))?;
    let items: Vec<T> =
        serde_json::from_slice(&bytes).map_err(|e| StoreError::durability(path, "parse", e))?;
    info!(path = %path.display(), kind, count = items.len(), "bootstrap file loaded");
    Ok(items)
}

/// Applications from a bootstrap file, in file order.
pub async fn load_applications(path: &Path) -> Result<Vec<Application>, StoreError> {
    load_array(path, "applications").await
}

/// Scopes from a bootstrap file, in file order.
pub async fn load_scopes(path: &Path) -> Result<Vec<Scope>, StoreError> {
    load_array(path, "scopes").await
}

/// Built-in sample clients: a client-credentials console and a desktop app using the
/// authorization-code flow against a loopback redirect.
pub fn default_applications() -> Result<Vec<Application>, StoreError> {
    use permissions::*;
    let api_scope = format!("{SCOPE_PREFIX}api");

    let mut console = Application::with_id("console")?;
    console.client_id = "clientcredentials".into();
    console.client_secret = "123456".into();
    console.permissions = vec![
        ENDPOINT_TOKEN.into(),
        GRANT_CLIENT_CREDENTIALS.into(),
        GRANT_REFRESH_TOKEN.into(),
        api_scope.clone(),
    ];

    let mut desktop = Application::with_id("desktopapp")?;
    desktop.client_id = "desktopapp".into();
    desktop.client_secret = "123456".into();
    desktop.redirect_uris = vec!["http://127.0.0.1:23480".into()];
    desktop.permissions = vec![
        ENDPOINT_TOKEN.into(),
        ENDPOINT_AUTHORIZATION.into(),
        GRANT_CLIENT_CREDENTIALS.into(),
        GRANT_AUTHORIZATION_CODE.into(),
        GRANT_REFRESH_TOKEN.into(),
        api_scope,
        RESPONSE_TYPE_CODE.into(),
    ];

    Ok(vec![console, desktop])
}

pub fn default_scopes() -> Result<Vec<Scope>, StoreError> {
    Ok(vec![Scope::named("api")?])
}

/// Bootstrap file when configured, otherwise the built-in sample.
pub async fn applications_from(path: Option<&Path>) -> Result<Vec<Application>, StoreError> {
    match path {
        Some(path) => load_applications(path).await,
        None => default_applications(),
    }
}

pub async fn scopes_from(path: Option<&Path>) -> Result<Vec<Scope>, StoreError> {
    match path {
        Some(path) => load_scopes(path).await,
        None => default_scopes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_applications_in_file_order() -> anyhow::Result<()> {
        let tmp = std::env::temp_dir().join(format!("bootstrap_apps_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(
            &tmp,
            r#"[
                {"id": "spa", "client_id": "spa", "app_type": "public", "consent_type": "explicit"},
                {"id": "svc", "client_id": "service", "client_secret": "s3cret",
                 "permissions": ["ept:token", "gt:client_credentials"]}
            ]"#,
        )
        .await?;

        let apps = load_applications(&tmp).await?;
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].client_type, "public");
        assert_eq!(apps[1].client_id, "service");
        assert_eq!(apps[1].permissions.len(), 2);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_bootstrap_file_is_fatal() {
        let tmp = std::env::temp_dir().join(format!("bootstrap_none_{}.json", uuid::Uuid::new_v4()));
        let err = load_scopes(&tmp).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn falls_back_to_built_in_seed() -> anyhow::Result<()> {
        let apps = applications_from(None).await?;
        let client_ids: Vec<&str> = apps.iter().map(|a| a.client_id.as_str()).collect();
        assert_eq!(client_ids, vec!["clientcredentials", "desktopapp"]);
        assert!(apps[1].permissions.iter().any(|p| p == "scp:api"));

        let scopes = scopes_from(None).await?;
        assert_eq!(scopes.len(), 1);
        assert_eq!(scopes[0].name, "api");
        Ok(())
    }
}
