//! # Validator
//!
//! Walks a JSON-LD document against a registered [`EntityShape`] and
//! collects every violation before returning.
//!
//! Only two things are checked: required fields are present (non-null),
//! and present declared fields have the declared type. Undeclared fields
//! are tolerated. A missing shape is the only error that aborts a call; a
//! non-conforming document yields a [`ValidationResult`] with
//! `valid() == false`.
//!
//! ## Paths
//!
//! Violations carry RFC 6901 JSON Pointers into the document: `""` for
//! the root, `/publisher/logo/url`, `/image/1`.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use ldgen_core::LdDocument;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::loader::escape_pointer;
use crate::registry::{self, RegistryError, SchemaRegistry};
use crate::shape::{EntityShape, FieldType};

/// What went wrong at one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// A required field is absent or `null`.
    MissingField,
    /// A present field does not have its declared type.
    TypeMismatch {
        /// Description of the declared type.
        expected: String,
        /// Description of what was found.
        found: String,
    },
}

/// One violation in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the offending field.
    pub path: String,
    /// What went wrong there.
    pub kind: ViolationKind,
}

impl Violation {
    fn missing(path: String) -> Self {
        Self {
            path,
            kind: ViolationKind::MissingField,
        }
    }

    fn mismatch(path: &str, expected: &FieldType, found: &Value) -> Self {
        Self {
            path: path.to_string(),
            kind: ViolationKind::TypeMismatch {
                expected: expected.describe(),
                found: describe_found(expected, found),
            },
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "(root)" } else { &self.path };
        match &self.kind {
            ViolationKind::MissingField => write!(f, "{path}: missing required field"),
            ViolationKind::TypeMismatch { expected, found } => {
                write!(f, "{path}: expected {expected}, found {found}")
            }
        }
    }
}

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<Violation>,
}

impl ValidationResult {
    /// Whether no violations were found.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Violations in document walk order.
    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    /// Paths of [`ViolationKind::MissingField`] violations.
    pub fn missing_fields(&self) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .filter(|v| v.kind == ViolationKind::MissingField)
            .map(|v| v.path.as_str())
    }

    /// Consume into the violations.
    pub fn into_errors(self) -> Vec<Violation> {
        self.errors
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid() {
            return f.write_str("valid");
        }
        for (i, v) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Failure of [`Validator::validate_str`].
#[derive(Error, Debug)]
pub enum ValidateError {
    /// The named shape is not registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The text is not JSON.
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validates documents against the shapes of one registry.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Validator<'r> {
    /// A validator over `registry`.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validate `document` against shape `(name, version)`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownShape`] if the shape is not registered.
    /// Document problems are reported in the result, never as errors.
    pub fn validate(
        &self,
        name: &str,
        version: &str,
        document: &Value,
    ) -> Result<ValidationResult, RegistryError> {
        let shape = self.registry.lookup(name, version)?;
        let mut errors = Vec::new();
        match document {
            Value::Object(map) => check_object(shape, map, "", &mut errors),
            other => errors.push(Violation::mismatch(
                "",
                &FieldType::Object(Box::new(shape.clone())),
                other,
            )),
        }
        tracing::debug!(
            shape = %shape.key(),
            violations = errors.len(),
            "validated document"
        );
        Ok(ValidationResult { errors })
    }

    /// Parse `text` as JSON, then [`validate`](Self::validate) it.
    pub fn validate_str(
        &self,
        name: &str,
        version: &str,
        text: &str,
    ) -> Result<ValidationResult, ValidateError> {
        let document: Value = serde_json::from_str(text)?;
        Ok(self.validate(name, version, &document)?)
    }

    /// Validate a composed document as it would serialize.
    pub fn validate_document(
        &self,
        name: &str,
        version: &str,
        document: &LdDocument,
    ) -> Result<ValidationResult, RegistryError> {
        self.validate(name, version, &document.to_json())
    }
}

/// Validate against the process-wide registry.
///
/// # Errors
///
/// [`RegistryError::NotInstalled`] before [`registry::install`], otherwise
/// as [`Validator::validate`].
pub fn validate(name: &str, version: &str, document: &Value) -> Result<ValidationResult, RegistryError> {
    Validator::new(registry::installed()?).validate(name, version, document)
}

fn check_object(shape: &EntityShape, map: &Map<String, Value>, path: &str, errors: &mut Vec<Violation>) {
    for field in shape.required() {
        if map.get(field).map_or(true, Value::is_null) {
            errors.push(Violation::missing(child_path(path, field)));
        }
    }
    for (field, field_type) in shape.fields() {
        match map.get(field) {
            None | Some(Value::Null) => {}
            Some(value) => check_value(field_type, value, &child_path(path, field), errors),
        }
    }
}

fn check_value(expected: &FieldType, value: &Value, path: &str, errors: &mut Vec<Violation>) {
    let conforms = match (expected, value) {
        (FieldType::Any, _) => true,
        (FieldType::Text, Value::String(_)) => true,
        (FieldType::Number, Value::Number(_)) => true,
        (FieldType::Integer, Value::Number(n)) => is_integer(n),
        (FieldType::Boolean, Value::Bool(_)) => true,
        (FieldType::Url, Value::String(s)) => is_absolute_url(s),
        (FieldType::DateTime, Value::String(s)) => DateTime::parse_from_rfc3339(s).is_ok(),
        (FieldType::Date, Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
        (FieldType::Enumeration(values), Value::String(s)) => values.iter().any(|v| v == s),
        (FieldType::Object(shape), Value::Object(map)) => {
            check_object(shape, map, path, errors);
            return;
        }
        (FieldType::Array(item), Value::Array(elements)) => {
            for (i, element) in elements.iter().enumerate() {
                check_value(item, element, &child_path(path, &i.to_string()), errors);
            }
            return;
        }
        (FieldType::AnyOf(alternatives), _) => {
            check_any_of(expected, alternatives, value, path, errors);
            return;
        }
        _ => false,
    };
    if !conforms {
        errors.push(Violation::mismatch(path, expected, value));
    }
}

/// Passes if any alternative passes. Otherwise, if the value's kind (and
/// for objects its `@type`) singles out one alternative, that
/// alternative's violations are reported; else one mismatch for the whole
/// union.
fn check_any_of(
    expected: &FieldType,
    alternatives: &[FieldType],
    value: &Value,
    path: &str,
    errors: &mut Vec<Violation>,
) {
    let mut candidates = Vec::new();
    for alternative in alternatives {
        let mut scratch = Vec::new();
        check_value(alternative, value, path, &mut scratch);
        if scratch.is_empty() {
            return;
        }
        if alternative.admits_kind(value) {
            candidates.push((alternative, scratch));
        }
    }

    if candidates.len() > 1 {
        if let Some(type_name) = value.get("@type").and_then(Value::as_str) {
            candidates.retain(|(alternative, _)| declares_type(alternative, type_name));
        }
    }

    match candidates.len() {
        1 => {
            let (_, nested) = candidates.remove(0);
            errors.extend(nested);
        }
        _ => errors.push(Violation::mismatch(path, expected, value)),
    }
}

/// Whether an object alternative's `@type` admits `type_name`.
fn declares_type(alternative: &FieldType, type_name: &str) -> bool {
    match alternative {
        FieldType::Object(shape) => match shape.field_type("@type") {
            Some(FieldType::Enumeration(values)) => values.iter().any(|v| v == type_name),
            _ => true,
        },
        _ => false,
    }
}

/// Integral JSON numbers, including `1.0`.
fn is_integer(n: &serde_json::Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn is_absolute_url(text: &str) -> bool {
    url::Url::parse(text).is_ok()
}

fn child_path(parent: &str, token: &str) -> String {
    format!("{parent}/{}", escape_pointer(token))
}

fn describe_found(expected: &FieldType, found: &Value) -> String {
    match found {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) if matches!(expected, FieldType::Integer) => format!("number {n}"),
        Value::Number(_) => "number".to_string(),
        Value::String(s) if expected.admits_kind(found) => format!("string {s:?}"),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(map) => match map.get("@type").and_then(Value::as_str) {
            Some(type_name) => format!("object ({type_name})"),
            None => "object".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let person = EntityShape::new("Person", "1.0.0")
            .require("@type")
            .require("name")
            .field("@type", FieldType::Enumeration(vec!["Person".into()]))
            .field("name", FieldType::Text);
        let organization = EntityShape::new("Organization", "1.0.0")
            .require("@type")
            .field("@type", FieldType::Enumeration(vec!["Organization".into()]))
            .field("url", FieldType::Url);
        let article = EntityShape::new("Article", "1.0.0")
            .require("@type")
            .require("headline")
            .require("datePublished")
            .field("@type", FieldType::Enumeration(vec!["Article".into()]))
            .field("headline", FieldType::Text)
            .field("datePublished", FieldType::DateTime)
            .field("validUntil", FieldType::Date)
            .field("position", FieldType::Integer)
            .field(
                "image",
                FieldType::AnyOf(vec![FieldType::Url, FieldType::Array(Box::new(FieldType::Url))]),
            )
            .field(
                "author",
                FieldType::AnyOf(vec![
                    FieldType::Text,
                    FieldType::Object(Box::new(person)),
                    FieldType::Object(Box::new(organization.clone())),
                ]),
            )
            .field("publisher", FieldType::Object(Box::new(organization)));
        let mut registry = SchemaRegistry::new();
        registry.register(article).unwrap();
        registry
    }

    fn check(doc: Value) -> ValidationResult {
        Validator::new(&registry()).validate("Article", "1.0.0", &doc).unwrap()
    }

    #[test]
    fn conforming_document_is_valid() {
        let result = check(json!({
            "@type": "Article",
            "headline": "h",
            "datePublished": "2015-02-05T08:00:00+08:00",
            "image": ["https://example.com/a.jpg", "https://example.com/b.jpg"],
            "author": { "@type": "Person", "name": "Jane Blogs" },
            "extra": { "anything": [1, 2, 3] },
        }));
        assert!(result.valid(), "{result}");
        assert!(result.errors().is_empty());
    }

    #[test]
    fn missing_required_field_is_reported_once_at_its_path() {
        let result = check(json!({
            "@type": "Article",
            "datePublished": "2015-02-05T08:00:00+08:00",
        }));
        assert!(!result.valid());
        assert_eq!(result.errors(), [Violation::missing("/headline".to_string())]);
    }

    #[test]
    fn null_counts_as_missing() {
        let result = check(json!({
            "@type": "Article",
            "headline": null,
            "datePublished": "2015-02-05T08:00:00+08:00",
        }));
        assert_eq!(result.missing_fields().collect::<Vec<_>>(), vec!["/headline"]);
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn every_violation_is_collected() {
        let result = check(json!({
            "@type": "Blog",
            "headline": 7,
            "datePublished": "yesterday",
            "image": ["https://example.com/a.jpg", "not a url", "https://example.com/c.jpg", 4],
            "publisher": { "url": "https://example.com" },
        }));
        let paths: Vec<&str> = result.errors().iter().map(|v| v.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/@type",
                "/headline",
                "/datePublished",
                "/image/1",
                "/image/3",
                "/publisher/@type",
            ]
        );
    }

    #[test]
    fn mismatch_describes_expected_and_found() {
        let result = check(json!({
            "@type": "Article",
            "headline": "h",
            "datePublished": "2015-02-05",
        }));
        assert_eq!(
            result.errors()[0].kind,
            ViolationKind::TypeMismatch {
                expected: "date-time".to_string(),
                found: "string \"2015-02-05\"".to_string(),
            }
        );
        assert_eq!(
            result.errors()[0].to_string(),
            "/datePublished: expected date-time, found string \"2015-02-05\""
        );
    }

    #[test]
    fn dates_and_integers_are_checked() {
        let result = check(json!({
            "@type": "Article",
            "headline": "h",
            "datePublished": "2017-01-06T03:37:40Z",
            "validUntil": "2020-11-05",
            "position": 2,
        }));
        assert!(result.valid(), "{result}");

        let result = check(json!({
            "@type": "Article",
            "headline": "h",
            "datePublished": "2017-01-06T03:37:40Z",
            "validUntil": "05/11/2020",
            "position": 2.5,
        }));
        let paths: Vec<&str> = result.errors().iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["/validUntil", "/position"]);
    }

    #[test]
    fn any_of_reports_nested_violations_of_the_matching_alternative() {
        let result = check(json!({
            "@type": "Article",
            "headline": "h",
            "datePublished": "2015-02-05T08:00:00+08:00",
            "author": { "@type": "Person" },
        }));
        assert_eq!(result.errors(), [Violation::missing("/author/name".to_string())]);
    }

    #[test]
    fn any_of_without_a_single_candidate_reports_one_mismatch() {
        let result = check(json!({
            "@type": "Article",
            "headline": "h",
            "datePublished": "2015-02-05T08:00:00+08:00",
            "author": 42,
        }));
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].path, "/author");
        assert!(matches!(
            &result.errors()[0].kind,
            ViolationKind::TypeMismatch { found, .. } if found == "number"
        ));
    }

    #[test]
    fn non_object_document_is_one_root_mismatch() {
        let result = check(json!(["not", "an", "object"]));
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].path, "");
        assert!(result.errors()[0].to_string().starts_with("(root): expected object (Article)"));
    }

    #[test]
    fn unknown_shape_fails_the_call() {
        let registry = registry();
        let err = Validator::new(&registry)
            .validate("Article", "2.0.0", &json!({}))
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownShape(_)));
    }

    #[test]
    fn validate_str_parses_first() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let result = validator
            .validate_str(
                "Article",
                "1.0.0",
                r#"{"@type":"Article","headline":"h","datePublished":"2015-02-05T08:00:00Z"}"#,
            )
            .unwrap();
        assert!(result.valid());
        assert!(matches!(
            validator.validate_str("Article", "1.0.0", "{"),
            Err(ValidateError::Json(_))
        ));
    }

    #[test]
    fn pointer_tokens_in_field_names_are_escaped() {
        let shape = EntityShape::new("Odd", "1.0.0").require("a/b");
        let mut registry = SchemaRegistry::new();
        registry.register(shape).unwrap();
        let result = Validator::new(&registry).validate("Odd", "1.0.0", &json!({})).unwrap();
        assert_eq!(result.errors()[0].path, "/a~1b");
    }

    #[test]
    fn integral_floats_count_as_integers() {
        let base = || {
            json!({
                "@type": "Article",
                "headline": "h",
                "datePublished": "2015-02-05T08:00:00+08:00",
            })
        };
        let mut whole = base();
        whole["position"] = json!(1.0);
        assert!(check(whole).valid());

        let mut fractional = base();
        fractional["position"] = json!(1.5);
        let result = check(fractional);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].path, "/position");
    }
}
