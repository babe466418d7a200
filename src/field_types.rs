//! The field→type dictionary supplied by callers.

use serde_json::Value as JsonValue;

use crate::error::{Result, TqlError};

/// Ordered, read-only mapping from field name to type name.
///
/// Iteration follows insertion order, which is the order wildcard
/// expansion uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTypes {
    entries: Vec<(String, String)>,
}

impl FieldTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing the type of an existing one in place.
    pub fn with(mut self, field: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.insert(field.into(), type_name.into());
        self
    }

    fn insert(&mut self, field: String, type_name: String) {
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = type_name,
            None => self.entries.push((field, type_name)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, type_name)| type_name.as_str())
    }

    /// Like [`get`](Self::get), but a missing field is an error.
    pub fn require(&self, field: &str) -> Result<&str> {
        self.get(field).ok_or_else(|| TqlError::TypeNotFound {
            field: field.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, type_name)| (name.as_str(), type_name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads a JSON object such as `{"name": "STRING", "age": "INTEGER"}`,
    /// keeping key order.
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        let object = json.as_object().ok_or_else(|| {
            TqlError::Semantic("field types must be a JSON object".to_string())
        })?;

        let mut types = FieldTypes::new();
        for (field, type_name) in object {
            let type_name = type_name.as_str().ok_or_else(|| {
                TqlError::Semantic(format!("type of field '{}' must be a string", field))
            })?;
            types.insert(field.clone(), type_name.to_string());
        }
        Ok(types)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)
            .map_err(|e| TqlError::Semantic(format!("invalid field types JSON: {}", e)))?;
        Self::from_json(&value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldTypes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut types = FieldTypes::new();
        for (field, type_name) in iter {
            types.insert(field.into(), type_name.into());
        }
        types
    }
}
