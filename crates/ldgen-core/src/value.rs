//! # Field Values
//!
//! [`LdValue`] is the sum type for every JSON-LD field value the builders
//! accept. Scalar vs. list multiplicity is kept exactly as supplied:
//! `availableLanguage: "English"` stays a string and is never wrapped in a
//! one-element array.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::entity::LdEntity;

/// A JSON-LD field value.
#[derive(Debug, Clone, PartialEq)]
pub enum LdValue {
    /// Plain text.
    Text(String),
    /// Absolute URL. The text is kept verbatim, never normalized.
    Url(String),
    /// JSON number.
    Number(serde_json::Number),
    /// JSON boolean.
    Bool(bool),
    /// Nested typed entity.
    Entity(Box<LdEntity>),
    /// Untyped object in insertion order, e.g. a breadcrumb `item`
    /// `{ "@id": ..., "name": ... }`.
    Node(Vec<(String, LdValue)>),
    /// Ordered sequence.
    List(Vec<LdValue>),
}

impl LdValue {
    /// Build a node reference `{ "@id": id, "name": name }`.
    pub fn reference(id: impl Into<String>, name: Option<&str>) -> Self {
        let mut entries = vec![("@id".to_string(), LdValue::Text(id.into()))];
        if let Some(name) = name {
            entries.push(("name".to_string(), LdValue::Text(name.to_string())));
        }
        LdValue::Node(entries)
    }

    /// Short description of the value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            LdValue::Text(_) => "text",
            LdValue::Url(_) => "URL",
            LdValue::Number(_) => "number",
            LdValue::Bool(_) => "boolean",
            LdValue::Entity(_) => "entity",
            LdValue::Node(_) => "untyped object",
            LdValue::List(_) => "list",
        }
    }

    /// The string content of `Text` and `Url` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LdValue::Text(s) | LdValue::Url(s) => Some(s),
            _ => None,
        }
    }

    /// The nested entity, if this is an `Entity`.
    pub fn as_entity(&self) -> Option<&LdEntity> {
        match self {
            LdValue::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value` tree.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            LdValue::Text(s) | LdValue::Url(s) => Value::String(s.clone()),
            LdValue::Number(n) => Value::Number(n.clone()),
            LdValue::Bool(b) => Value::Bool(*b),
            LdValue::Entity(e) => e.to_json(),
            LdValue::Node(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            LdValue::List(items) => Value::Array(items.iter().map(LdValue::to_json).collect()),
        }
    }
}

impl Serialize for LdValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LdValue::Text(s) | LdValue::Url(s) => serializer.serialize_str(s),
            LdValue::Number(n) => n.serialize(serializer),
            LdValue::Bool(b) => serializer.serialize_bool(*b),
            LdValue::Entity(e) => e.serialize(serializer),
            LdValue::Node(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            LdValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for LdValue {
    fn from(s: &str) -> Self {
        LdValue::Text(s.to_string())
    }
}

impl From<String> for LdValue {
    fn from(s: String) -> Self {
        LdValue::Text(s)
    }
}

impl From<bool> for LdValue {
    fn from(b: bool) -> Self {
        LdValue::Bool(b)
    }
}

impl From<i64> for LdValue {
    fn from(n: i64) -> Self {
        LdValue::Number(n.into())
    }
}

impl From<u32> for LdValue {
    fn from(n: u32) -> Self {
        LdValue::Number(n.into())
    }
}

impl From<usize> for LdValue {
    fn from(n: usize) -> Self {
        LdValue::Number((n as u64).into())
    }
}

impl From<LdEntity> for LdValue {
    fn from(e: LdEntity) -> Self {
        LdValue::Entity(Box::new(e))
    }
}

impl<T: Into<LdValue>> From<Vec<T>> for LdValue {
    fn from(items: Vec<T>) -> Self {
        LdValue::List(items.into_iter().map(Into::into).collect())
    }
}
