use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{id, Entity};

/// A named permission scope (`api`, `email`, ...).
///
/// Name uniqueness is up to whoever seeds the scopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(deserialize_with = "id::deserialize_non_empty")]
    id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub display_names: BTreeMap<String, String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub descriptions: BTreeMap<String, String>,
    #[serde(default)]
    pub resources: Vec<String>,
    /// Serialized property blob, see [`crate::properties`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
}

impl Scope {
    pub fn new() -> Self {
        Self::blank(id::generate())
    }

    pub fn with_id(id: impl Into<String>) -> Result<Self, ModelError> {
        Ok(Self::blank(id::validate(id)?))
    }

    /// Scope whose Id and name are both `name`, the usual shape for seeded scopes.
    pub fn named(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        let mut scope = Self::with_id(name.clone())?;
        scope.name = name;
        Ok(scope)
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            name: String::new(),
            display_name: String::new(),
            display_names: BTreeMap::new(),
            description: String::new(),
            descriptions: BTreeMap::new(),
            resources: Vec::new(),
            properties: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Scope {
    fn id(&self) -> &str {
        &self.id
    }
}
