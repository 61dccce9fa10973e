//! Variables assigned to a template instance.

use crate::error::{Result, VellumError};
use serde::Serialize;
use serde_json::{Map, Value};

/// Name → value mapping visible to every view an instance renders.
///
/// Later assignments win; merging a mapping overwrites key by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: Map<String, Value>,
}

impl Bindings {
    /// Create empty bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind one variable.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Merge a mapping, overwriting existing names.
    pub fn merge(&mut self, values: Map<String, Value>) {
        self.values.extend(values);
    }

    /// Merge any serializable map or struct.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBindings` if `value` does not serialize to an object.
    pub fn merge_serialize<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| VellumError::InvalidBindings {
            message: e.to_string(),
        })?;
        match value {
            Value::Object(map) => {
                self.merge(map);
                Ok(())
            }
            other => Err(VellumError::InvalidBindings {
                message: format!("expected a map or struct, got {}", kind(&other)),
            }),
        }
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
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
