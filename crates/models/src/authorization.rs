use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{id, Entity};

/// A consent grant given by a subject to an application.
///
/// `status` is free-form (`valid`, `revoked`, ...) and owned by the protocol layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authorization {
    #[serde(deserialize_with = "id::deserialize_non_empty")]
    id: String,
    /// Empty when the authorization is not tied to an application.
    #[serde(default)]
    pub application_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default, rename = "type")]
    pub authorization_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: Option<String>,
}

impl Authorization {
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
            subject: String::new(),
            authorization_type: String::new(),
            status: String::new(),
            scopes: Vec::new(),
            creation_date: None,
            properties: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Default for Authorization {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Authorization {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn explicit_empty_id_is_rejected() {
        assert!(Authorization::with_id("").is_err());
    }

    #[test]
    fn id_is_required_but_other_fields_default() -> anyhow::Result<()> {
        assert!(serde_json::from_str::<Authorization>(r#"{"subject":"alice"}"#).is_err());
        let auth: Authorization = serde_json::from_str(r#"{"id":"a1"}"#)?;
        assert_eq!(auth.id(), "a1");
        assert!(auth.scopes.is_empty());
        assert!(auth.creation_date.is_none());
        Ok(())
    }

    #[test]
    fn json_shape_uses_snake_case_aliases() -> anyhow::Result<()> {
        let mut auth = Authorization::with_id("a1")?;
        auth.application_id = "console".into();
        auth.authorization_type = "permanent".into();
        auth.creation_date = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        auth.properties = Some(r#"{"k":1}"#.into());
        let value = serde_json::to_value(&auth)?;
        assert_eq!(value["application_id"], "console");
        assert_eq!(value["type"], "permanent");
        assert_eq!(value["creation_date"], "2024-05-01T12:00:00Z");
        let back: Authorization = serde_json::from_value(value)?;
        assert_eq!(back, auth);
        Ok(())
    }
}
