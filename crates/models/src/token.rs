use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{id, Entity};

/// An access, refresh or reference token record.
///
/// `reference_id` is a second lookup key used for reference (non self-contained) tokens.
/// `payload` is opaque and may already be encrypted upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(deserialize_with = "id::deserialize_non_empty")]
    id: String,
    #[serde(default)]
    pub application_id: String,
    #[serde(default)]
    pub authorization_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default, rename = "type")]
    pub token_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub reference_id: String,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub redemption_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: Option<String>,
}

impl Token {
    pub fn new() -> Self {
        Self::blank(id::generate())
    }

    pub fn with_id(id: impl Into<String>) -> Result<Self, ModelError> {
        Ok(Self::blank(id::validate(id)?))
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            application_id: String::new(),
            authorization_id: String::new(),
            subject: String::new(),
            token_type: String::new(),
            status: String::new(),
            payload: String::new(),
            reference_id: String::new(),
            creation_date: None,
            expiration_date: None,
            redemption_date: None,
            properties: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Token {
    fn id(&self) -> &str {
        &self.id
    }
}
