//! Resource state as seen at the provider boundary
//!
//! State documents are JSON objects of the form
//! `{"id": "...", "attributes": {...}}`. Attribute values are untyped until a
//! resource's expand function reads them through an [`AttributeReader`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{OctopusError, Result};

/// Attribute map keyed by attribute name
pub type Attributes = BTreeMap<String, AttributeValue>;

/// A single attribute value
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(untagged)]
pub enum AttributeValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<AttributeValue>),
    Map(Attributes),
}

impl AttributeValue {
    fn kind(&self) -> &'static str {
        match self {
            AttributeValue::Null => "null",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Int(_) => "int",
            AttributeValue::String(_) => "string",
            AttributeValue::List(_) => "list",
            AttributeValue::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => Ok(()),
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Int(i) => write!(f, "{}", i),
            AttributeValue::String(s) => write!(f, "{}", s),
            AttributeValue::List(items) => write!(f, "[{} items]", items.len()),
            AttributeValue::Map(map) => write!(f, "{{{} keys}}", map.len()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(values: Vec<String>) -> Self {
        AttributeValue::List(values.into_iter().map(AttributeValue::String).collect())
    }
}

impl From<Vec<Attributes>> for AttributeValue {
    fn from(blocks: Vec<Attributes>) -> Self {
        AttributeValue::List(blocks.into_iter().map(AttributeValue::Map).collect())
    }
}

impl From<BTreeMap<String, String>> for AttributeValue {
    fn from(values: BTreeMap<String, String>) -> Self {
        AttributeValue::Map(
            values
                .into_iter()
                .map(|(k, v)| (k, AttributeValue::String(v)))
                .collect(),
        )
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttributeValue::Null)
    }
}

/// State of one resource instance
///
/// An empty `id` means the resource does not exist (or no longer exists).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ResourceData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl ResourceData {
    pub fn new(attributes: Attributes) -> Self {
        Self {
            id: String::new(),
            attributes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Mark the resource as gone
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }

    /// Set an attribute, replacing any previous value
    pub fn set(&mut self, key: &str, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// Typed view over the top-level attributes
    pub fn reader(&self) -> AttributeReader<'_> {
        AttributeReader {
            prefix: String::new(),
            attributes: &self.attributes,
        }
    }
}

/// Typed, path-aware access to an attribute map
///
/// Errors name the full attribute path (for example `step.0.action.1.name`).
#[derive(Debug, Clone)]
pub struct AttributeReader<'a> {
    prefix: String,
    attributes: &'a Attributes,
}

impl<'a> AttributeReader<'a> {
    /// Reader over a free-standing attribute map
    pub fn new(attributes: &'a Attributes) -> Self {
        Self {
            prefix: String::new(),
            attributes,
        }
    }

    /// Full path of attribute `name` under this reader
    pub fn key(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.prefix, name)
        }
    }

    fn get(&self, name: &str) -> Option<&'a AttributeValue> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    fn type_error(&self, name: &str, expected: &str, found: &AttributeValue) -> OctopusError {
        OctopusError::attribute(
            &self.key(name),
            format!("expected {}, found {}", expected, found.kind()),
        )
    }

    /// Optional string; empty strings count as absent
    pub fn string(&self, name: &str) -> Result<Option<String>> {
        match self.get(name) {
            None => Ok(None),
            Some(AttributeValue::String(s)) if s.is_empty() => Ok(None),
            Some(AttributeValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.type_error(name, "string", other)),
        }
    }

    pub fn required_string(&self, name: &str) -> Result<String> {
        self.string(name)?
            .ok_or_else(|| OctopusError::attribute(&self.key(name), "is required"))
    }

    pub fn string_or(&self, name: &str, default: &str) -> Result<String> {
        Ok(self.string(name)?.unwrap_or_else(|| default.to_string()))
    }

    pub fn bool(&self, name: &str) -> Result<Option<bool>> {
        match self.get(name) {
            None => Ok(None),
            Some(AttributeValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.type_error(name, "bool", other)),
        }
    }

    /// Optional integer; a numeric string such as `"5"` is accepted too
    pub fn int(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            None => Ok(None),
            Some(AttributeValue::Int(i)) => Ok(Some(*i)),
            Some(AttributeValue::String(s)) if s.trim().is_empty() => Ok(None),
            Some(AttributeValue::String(s)) => s.trim().parse().map(Some).map_err(|_| {
                OctopusError::attribute(&self.key(name), format!("'{}' is not an integer", s))
            }),
            Some(other) => Err(self.type_error(name, "int", other)),
        }
    }

    /// List of strings, in order; absent means empty
    pub fn string_list(&self, name: &str) -> Result<Vec<String>> {
        let items = match self.get(name) {
            None => return Ok(Vec::new()),
            Some(AttributeValue::List(items)) => items,
            Some(other) => return Err(self.type_error(name, "list", other)),
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                AttributeValue::String(s) => Ok(s.clone()),
                other => Err(self.type_error(&format!("{}.{}", name, i), "string", other)),
            })
            .collect()
    }

    /// Map of strings; absent means empty
    pub fn string_map(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let map = match self.get(name) {
            None => return Ok(BTreeMap::new()),
            Some(AttributeValue::Map(map)) => map,
            Some(other) => return Err(self.type_error(name, "map", other)),
        };

        map.iter()
            .map(|(k, v)| match v {
                AttributeValue::String(s) => Ok((k.clone(), s.clone())),
                other => Err(self.type_error(&format!("{}.{}", name, k), "string", other)),
            })
            .collect()
    }

    /// Nested blocks, in order; absent means none
    pub fn blocks(&self, name: &str) -> Result<Vec<AttributeReader<'a>>> {
        let items = match self.get(name) {
            None => return Ok(Vec::new()),
            Some(AttributeValue::List(items)) => items,
            Some(other) => return Err(self.type_error(name, "list of blocks", other)),
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                AttributeValue::Map(attributes) => Ok(AttributeReader {
                    prefix: self.key(&format!("{}.{}", name, i)),
                    attributes,
                }),
                other => Err(self.type_error(&format!("{}.{}", name, i), "block", other)),
            })
            .collect()
    }

    /// A block that may appear at most once
    pub fn single_block(&self, name: &str) -> Result<Option<AttributeReader<'a>>> {
        let mut blocks = self.blocks(name)?;
        if blocks.len() > 1 {
            return Err(OctopusError::attribute(
                &self.key(name),
                format!("at most one block allowed, found {}", blocks.len()),
            ));
        }
        Ok(blocks.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ResourceData {
        serde_json::from_value(serde_json::json!({
            "id": "Accounts-1",
            "attributes": {
                "name": "aws",
                "empty": "",
                "gone": null,
                "disabled": true,
                "attempts": 5,
                "environments": ["Environments-1", "Environments-2"],
                "properties": {"a": "1", "b": "2"},
                "step": [
                    {"name": "first", "action": [{"name": "a1"}, {"name": 7}]},
                    {"name": "second"}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_state_document_deserialization() {
        let data = state();
        assert_eq!(data.id(), "Accounts-1");
        assert!(data.exists());
        assert_eq!(data.attributes["attempts"], AttributeValue::Int(5));
        assert!(data.attributes["gone"].is_null());
    }

    #[test]
    fn test_scalar_getters() {
        let data = state();
        let reader = data.reader();
        assert_eq!(reader.required_string("name").unwrap(), "aws");
        assert_eq!(reader.string("empty").unwrap(), None);
        assert_eq!(reader.string("gone").unwrap(), None);
        assert_eq!(reader.string_or("missing", "fallback").unwrap(), "fallback");
        assert_eq!(reader.bool("disabled").unwrap(), Some(true));
        assert_eq!(reader.int("attempts").unwrap(), Some(5));
    }

    #[test]
    fn test_int_accepts_numeric_string() {
        let data: ResourceData = serde_json::from_value(serde_json::json!({
            "attributes": {"attempts": "5", "backoff": " 10 ", "blank": "", "word": "five"}
        }))
        .unwrap();
        let reader = data.reader();
        assert_eq!(reader.int("attempts").unwrap(), Some(5));
        assert_eq!(reader.int("backoff").unwrap(), Some(10));
        assert_eq!(reader.int("blank").unwrap(), None);

        let err = reader.int("word").unwrap_err();
        assert_eq!(err.to_string(), "attribute 'word': 'five' is not an integer");
    }

    #[test]
    fn test_required_string_missing() {
        let data = state();
        let err = data.reader().required_string("empty").unwrap_err();
        assert_eq!(err.to_string(), "attribute 'empty': is required");
    }

    #[test]
    fn test_type_mismatch_names_attribute() {
        let data = state();
        let err = data.reader().bool("name").unwrap_err();
        assert_eq!(err.to_string(), "attribute 'name': expected bool, found string");
    }

    #[test]
    fn test_collections_keep_order() {
        let data = state();
        let reader = data.reader();
        assert_eq!(
            reader.string_list("environments").unwrap(),
            vec!["Environments-1", "Environments-2"]
        );
        assert_eq!(reader.string_list("missing").unwrap(), Vec::<String>::new());
        assert_eq!(reader.string_map("properties").unwrap().len(), 2);

        let steps = reader.blocks("step").unwrap();
        let names: Vec<String> = steps
            .iter()
            .map(|s| s.required_string("name").unwrap())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_nested_error_path() {
        let data = state();
        let steps = data.reader().blocks("step").unwrap();
        let actions = steps[0].blocks("action").unwrap();
        let err = actions[1].required_string("name").unwrap_err();
        assert_eq!(
            err.to_string(),
            "attribute 'step.0.action.1.name': expected string, found int"
        );
    }

    #[test]
    fn test_single_block_rejects_many() {
        let data = state();
        assert!(data.reader().single_block("step").is_err());
        assert!(data.reader().single_block("missing").unwrap().is_none());
    }

    #[test]
    fn test_set_and_serialize() {
        let mut data = ResourceData::default();
        data.set("name", "feed");
        data.set("attempts", 3i64);
        data.set("username", None::<String>);
        data.set("tags", vec!["a".to_string()]);
        data.set_id("Feeds-1");

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["id"], "Feeds-1");
        assert_eq!(value["attributes"]["attempts"], 3);
        assert!(value["attributes"]["username"].is_null());
        assert_eq!(value["attributes"]["tags"][0], "a");

        data.clear_id();
        assert!(!data.exists());
    }
}
