//! Identifier helpers shared by every entity type.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::errors::ModelError;

/// Fresh random identifier for a blank entity.
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}

/// Accept a caller-supplied identifier, rejecting the empty string.
pub fn validate(id: impl Into<String>) -> Result<String, ModelError> {
    let id = id.into();
    if id.is_empty() {
        return Err(ModelError::InvalidArgument("id"));
    }
    Ok(id)
}

/// Serde hook so a stored `"id": ""` fails to load instead of producing an unusable entity.
pub(crate) fn deserialize_non_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    validate(raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_non_empty() {
        let a = generate();
        let b = generate();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn empty_id_is_rejected() {
        assert!(matches!(validate(""), Err(ModelError::InvalidArgument("id"))));
        assert_eq!(validate("console").unwrap(), "console");
    }
}
