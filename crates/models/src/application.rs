use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::properties::PropertyMap;
use crate::{id, Entity};

/// A registered client application.
///
/// `client_id` is the external-facing handle; `id` is the storage key, and the two may differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(deserialize_with = "id::deserialize_non_empty")]
    id: String,
    #[serde(default)]
    pub client_id: String,
    /// May be hashed or encrypted by whoever populated it.
    #[serde(default)]
    pub client_secret: String,
    /// `confidential` or `public`.
    #[serde(default, rename = "type", alias = "app_type")]
    pub client_type: String,
    #[serde(default)]
    pub consent_type: String,
    #[serde(default)]
    pub display_name: String,
    /// Localized display names keyed by culture tag.
    #[serde(default)]
    pub display_names: BTreeMap<String, String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub post_logout_redirect_uris: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
    #[serde(default)]
    pub cors_domains: Vec<String>,
}

impl Application {
    /// Blank application with a freshly generated Id.
    pub fn new() -> Self {
        Self::blank(id::generate())
    }

    /// Blank application with a caller-chosen Id.
    pub fn with_id(id: impl Into<String>) -> Result<Self, ModelError> {
        Ok(Self::blank(id::validate(id)?))
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            client_id: String::new(),
            client_secret: String::new(),
            client_type: String::new(),
            consent_type: String::new(),
            display_name: String::new(),
            display_names: BTreeMap::new(),
            redirect_uris: Vec::new(),
            post_logout_redirect_uris: Vec::new(),
            permissions: Vec::new(),
            requirements: Vec::new(),
            properties: PropertyMap::new(),
            cors_domains: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Application {
    fn id(&self) -> &str {
        &self.id
    }
}
