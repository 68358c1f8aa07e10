use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::errors::CoreError;

/// Server-assigned record identifier.
pub type ResourceId = i64;

/// Field name (or error code) → human readable message.
pub type ErrorMap = BTreeMap<String, String>;

/// A single server record (account, category, transaction or detail).
///
/// Opaque to the reducers apart from its `id` field. The server is the
/// only authority for ids: nothing in this crate invents or rewrites one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Map<String, Value>);

impl Resource {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CoreError::Payload(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// The record id. Absent or zero means "not created yet".
    #[must_use]
    pub fn id(&self) -> Option<ResourceId> {
        self.0
            .get("id")
            .and_then(Value::as_i64)
            .filter(|id| *id != 0)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Shallow merge: fields of `update` win, fields it does not mention survive.
    #[must_use]
    pub fn merged(&self, update: &Resource) -> Resource {
        let mut fields = self.0.clone();
        for (key, value) in &update.0 {
            fields.insert(key.clone(), value.clone());
        }
        Resource(fields)
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Resource {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Normalize an error body into an [`ErrorMap`].
///
/// Accepts either `{"errors": {...}}` or a bare field → message object.
/// Array messages are joined with `"; "`. A plain string body becomes
/// `{"message": body}`; anything else yields an empty map.
#[must_use]
pub fn errors_from_value(value: &Value) -> ErrorMap {
    let object = match value {
        Value::Object(map) => match map.get("errors") {
            Some(Value::Object(inner)) => inner,
            _ => map,
        },
        Value::String(text) if !text.is_empty() => {
            let mut errors = ErrorMap::new();
            errors.insert("message".to_string(), text.clone());
            return errors;
        }
        _ => return ErrorMap::new(),
    };

    object
        .iter()
        .map(|(key, value)| (key.clone(), message_of(value)))
        .collect()
}

/// Turn an [`ErrorMap`] back into the JSON object carried by `*_FAILED` actions.
#[must_use]
pub fn errors_to_value(errors: &ErrorMap) -> Value {
    Value::Object(
        errors
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn message_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(message_of)
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
