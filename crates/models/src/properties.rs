//! Property blob codec.
//!
//! Extensible key/value metadata is kept on entities as one serialized JSON object string.
//! An empty map is stored as no blob at all, and decoding no blob yields an empty map.
//! Values are `serde_json::Value`, so every member is one of string/number/bool/array/object/null.

use serde_json::Value;

use crate::errors::ModelError;

/// Structured property map. Iteration order is insertion order.
pub type PropertyMap = serde_json::Map<String, Value>;

/// Encode a property map into a blob; `None` when there is nothing to store.
pub fn encode(properties: &PropertyMap) -> Result<Option<String>, ModelError> {
    if properties.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(properties)
        .map(Some)
        .map_err(|e| ModelError::Codec(e.to_string()))
}

/// Decode a blob into an owned property map.
///
/// The result shares nothing with the blob, so callers may mutate it freely.
pub fn decode(blob: Option<&str>) -> Result<PropertyMap, ModelError> {
    let Some(raw) = blob.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(PropertyMap::new());
    };
    match serde_json::from_str::<Value>(raw).map_err(|e| ModelError::Codec(e.to_string()))? {
        Value::Object(members) => Ok(members),
        other => Err(ModelError::Codec(format!(
            "property blob must be a JSON object, found {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PropertyMap {
        let Value::Object(map) = json!({
            "name": "desktop",
            "retries": 3,
            "ratio": 0.5,
            "enabled": true,
            "nested": { "a": [1, 2, { "b": null }] },
            "empty": "",
            "none": {}
        }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn encode_then_decode_restores_the_map() -> anyhow::Result<()> {
        let props = sample();
        let blob = encode(&props)?.expect("non-empty map encodes to a blob");
        let decoded = decode(Some(&blob))?;
        assert_eq!(decoded, props);
        Ok(())
    }

    #[test]
    fn encoding_keeps_insertion_order() -> anyhow::Result<()> {
        let mut props = PropertyMap::new();
        props.insert("zeta".into(), json!(1));
        props.insert("alpha".into(), json!(2));
        assert_eq!(encode(&props)?.as_deref(), Some(r#"{"zeta":1,"alpha":2}"#));
        Ok(())
    }

    #[test]
    fn non_ascii_is_written_verbatim() -> anyhow::Result<()> {
        let mut props = PropertyMap::new();
        props.insert("label".into(), json!("café <b>"));
        assert_eq!(encode(&props)?.as_deref(), Some(r#"{"label":"café <b>"}"#));
        Ok(())
    }

    #[test]
    fn empty_map_clears_the_blob() -> anyhow::Result<()> {
        assert_eq!(encode(&PropertyMap::new())?, None);
        Ok(())
    }

    #[test]
    fn absent_or_blank_blob_decodes_to_empty_map() -> anyhow::Result<()> {
        assert!(decode(None)?.is_empty());
        assert!(decode(Some(""))?.is_empty());
        assert!(decode(Some("   "))?.is_empty());
        Ok(())
    }

    #[test]
    fn decoded_map_does_not_alias_later_mutation() -> anyhow::Result<()> {
        let blob = r#"{"k":{"v":1}}"#.to_string();
        let mut first = decode(Some(&blob))?;
        first.insert("k".into(), json!("changed"));
        let second = decode(Some(&blob))?;
        assert_eq!(second.get("k"), Some(&json!({"v": 1})));
        Ok(())
    }

    #[test]
    fn non_object_blob_is_a_codec_error() {
        assert!(matches!(decode(Some("[1,2]")), Err(ModelError::Codec(_))));
        assert!(matches!(decode(Some("{not json")), Err(ModelError::Codec(_))));
    }
}
