//! Schema-free attribute bag attached to coordination facts.
//!
//! Facts carry an open map from string keys to arbitrary JSON values so that
//! payloads can be extended without touching the protocol tables. The engine
//! never interprets the contents.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::CoordinationError;

/// Open, ordered attribute bag for fact payload extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactDetails(BTreeMap<String, Value>);

impl FactDetails {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the bag holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Stores a serializable value under the given key.
    ///
    /// # Errors
    ///
    /// - `Serialization` if the value cannot be represented as JSON
    pub fn insert<V: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: V,
    ) -> Result<(), CoordinationError> {
        self.0.insert(key.into(), serde_json::to_value(&value)?);
        Ok(())
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with<V: Serialize>(
        mut self,
        key: impl Into<String>,
        value: V,
    ) -> Result<Self, CoordinationError> {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Reads a value back as a concrete type.
    ///
    /// Returns `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// - `Serialization` if the stored value does not match the requested type
    pub fn get<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>, CoordinationError> {
        match self.0.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Returns the raw JSON value under the given key.
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Checks whether the bag holds the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates over the attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_bag_is_empty() {
        let details = FactDetails::new();
        assert!(details.is_empty());
        assert_eq!(details.len(), 0);
    }

    #[test]
    fn insert_and_get_round_trip_typed_values() {
        let mut details = FactDetails::new();
        details.insert("quantity", 12_u32).unwrap();
        details.insert("unit", "kg").unwrap();

        assert_eq!(details.get::<u32>("quantity").unwrap(), Some(12));
        assert_eq!(details.get::<String>("unit").unwrap(), Some("kg".into()));
    }

    #[test]
    fn get_missing_key_returns_none() {
        let details = FactDetails::new();
        assert_eq!(details.get::<u32>("absent").unwrap(), None);
    }

    #[test]
    fn get_with_wrong_type_returns_error() {
        let details = FactDetails::new().with("quantity", "twelve").unwrap();
        assert!(details.get::<u32>("quantity").is_err());
    }

    #[test]
    fn with_chains_builder_style() {
        let details = FactDetails::new()
            .with("a", 1)
            .unwrap()
            .with("b", true)
            .unwrap();
        assert_eq!(details.len(), 2);
        assert!(details.contains("a"));
        assert!(details.contains("b"));
    }

    #[test]
    fn get_raw_exposes_json_value() {
        let details = FactDetails::new().with("nested", json!({"x": 1})).unwrap();
        assert_eq!(details.get_raw("nested").unwrap()["x"], 1);
    }

    #[test]
    fn serializes_transparently_as_object() {
        let details = FactDetails::new().with("unit", "kg").unwrap();
        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, r#"{"unit":"kg"}"#);

        let restored: FactDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, details);
    }

    #[test]
    fn iterates_in_key_order() {
        let details = FactDetails::new()
            .with("b", 2)
            .unwrap()
            .with("a", 1)
            .unwrap();
        let keys: Vec<&String> = details.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
