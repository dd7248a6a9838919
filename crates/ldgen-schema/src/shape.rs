//! # Entity Shapes
//!
//! An [`EntityShape`] is the validator's view of one schema.org type at
//! one version: which fields are required and what each declared field
//! must look like. Shapes are plain values; once registered they are never
//! mutated.
//!
//! Shapes describe an allow-list, not a deny-list. Fields a shape does not
//! declare are tolerated by the validator.

use std::fmt;

/// Expected type of a declared field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// JSON string.
    Text,
    /// JSON number.
    Number,
    /// JSON integer.
    Integer,
    /// JSON boolean.
    Boolean,
    /// String holding an absolute URL.
    Url,
    /// String holding an RFC 3339 date-time.
    DateTime,
    /// String holding a `YYYY-MM-DD` date.
    Date,
    /// String equal to one of the listed values.
    Enumeration(Vec<String>),
    /// Object conforming to a nested shape.
    Object(Box<EntityShape>),
    /// Array whose every element has this type.
    Array(Box<FieldType>),
    /// Passes if any alternative passes.
    AnyOf(Vec<FieldType>),
    /// Anything.
    Any,
}

impl FieldType {
    /// Human-readable description used in violation messages.
    pub fn describe(&self) -> String {
        match self {
            FieldType::Text => "string".to_string(),
            FieldType::Number => "number".to_string(),
            FieldType::Integer => "integer".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Url => "URL".to_string(),
            FieldType::DateTime => "date-time".to_string(),
            FieldType::Date => "date".to_string(),
            FieldType::Enumeration(values) => {
                let quoted: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
                format!("one of [{}]", quoted.join(", "))
            }
            FieldType::Object(shape) => format!("object ({})", shape.name()),
            FieldType::Array(item) => format!("array of {}", item.describe()),
            FieldType::AnyOf(alternatives) => alternatives
                .iter()
                .map(FieldType::describe)
                .collect::<Vec<_>>()
                .join(" | "),
            FieldType::Any => "any value".to_string(),
        }
    }

    /// Whether a value of this JSON kind could possibly satisfy the type.
    /// Used to pick which `AnyOf` alternative a value was aiming for.
    pub(crate) fn admits_kind(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value;
        match self {
            FieldType::Text
            | FieldType::Url
            | FieldType::DateTime
            | FieldType::Date
            | FieldType::Enumeration(_) => value.is_string(),
            FieldType::Number | FieldType::Integer => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Object(_) => value.is_object(),
            FieldType::Array(_) => value.is_array(),
            FieldType::AnyOf(alternatives) => alternatives.iter().any(|a| a.admits_kind(value)),
            FieldType::Any => !matches!(value, Value::Null),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Registry key: shape name plus semver version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeKey {
    /// Shape name, e.g. `"Article"` or `"Corporate Contact"`.
    pub name: String,
    /// Version string, e.g. `"1.0.0"`.
    pub version: String,
}

impl ShapeKey {
    /// Build a key from borrowed parts.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A named, versioned schema.org type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityShape {
    name: String,
    version: String,
    required: Vec<String>,
    fields: Vec<(String, FieldType)>,
}

impl EntityShape {
    /// An empty shape with no required or declared fields.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            required: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Mark a field required. Duplicates are ignored.
    pub fn require(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.required.contains(&field) {
            self.required.push(field);
        }
        self
    }

    /// Declare a field's type. Declaring a field again replaces its type.
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = field_type,
            None => self.fields.push((name, field_type)),
        }
        self
    }

    /// Shape name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Registry key for this shape.
    pub fn key(&self) -> ShapeKey {
        ShapeKey::new(self.name.clone(), self.version.clone())
    }

    /// Required field names, in declaration order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &[(String, FieldType)] {
        &self.fields
    }

    /// Declared type of a field.
    pub fn field_type(&self, name: &str) -> Option<&FieldType> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, t)| t)
    }
}
