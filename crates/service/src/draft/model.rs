use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::StoreError;

/// Field name to JSON value. Anything held here survives a text round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draft(Map<String, Value>);

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts only JSON objects; other values have no field names to merge.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(StoreError::Validation(format!("draft must be a JSON object, got {}", kind(&other)))),
        }
    }

    /// Serialize a typed form view into a partial draft.
    pub fn from_serialize<T: Serialize>(view: &T) -> Result<Self, StoreError> {
        let value = serde_json::to_value(view).map_err(|e| StoreError::Validation(e.to_string()))?;
        Self::from_value(value)
    }

    /// Shallow merge: every field of `partial` overwrites the same field here.
    pub fn merge(&mut self, partial: Draft) {
        for (field, value) in partial.0 {
            self.0.insert(field, value);
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read the draft through a typed form view. Unknown fields are ignored.
    pub fn typed<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.0.clone())).map_err(|e| StoreError::Validation(e.to_string()))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub(crate) fn to_text(&self, key: &str) -> Result<String, StoreError> {
        serde_json::to_string(&self.0).map_err(|e| StoreError::Validation(format!("{key}: {e}")))
    }

    pub(crate) fn from_text(key: &str, text: &str) -> Result<Self, StoreError> {
        let value: Value = serde_json::from_str(text).map_err(|e| StoreError::deserialize(key, e))?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(StoreError::deserialize(key, format!("expected a JSON object, got {}", kind(&other)))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl From<Map<String, Value>> for Draft {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Draft {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
