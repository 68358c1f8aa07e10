use serde_json::Value;

use crate::errors::CoreError;
use crate::models::kind::ResourceKind;
use crate::models::resource::json_type_name;

/// Check a collection response: `{"<collection_key>": [record, ...]}`.
pub fn validate_collection(kind: ResourceKind, data: &Value) -> Result<(), CoreError> {
    let key = kind.collection_key();
    let items = data
        .get(key)
        .ok_or_else(|| CoreError::Payload(format!("missing `{key}` in response")))?
        .as_array()
        .ok_or_else(|| CoreError::Payload(format!("`{key}` is not an array")))?;
    items
        .iter()
        .try_for_each(|item| validate_record(kind, item))
}

/// Check a single-record response: `{"<resource_key>": record}`.
pub fn validate_resource(kind: ResourceKind, data: &Value) -> Result<(), CoreError> {
    let key = kind.resource_key();
    let record = data
        .get(key)
        .ok_or_else(|| CoreError::Payload(format!("missing `{key}` in response")))?;
    validate_record(kind, record)
}

/// A record is an object with a non-zero integer `id`.
fn validate_record(kind: ResourceKind, record: &Value) -> Result<(), CoreError> {
    let key = kind.resource_key();
    let object = record.as_object().ok_or_else(|| {
        CoreError::Payload(format!("{key} is a {}, not an object", json_type_name(record)))
    })?;
    match object.get("id").and_then(Value::as_i64) {
        Some(id) if id != 0 => Ok(()),
        _ => Err(CoreError::Payload(format!("{key} without an integer id"))),
    }
}
