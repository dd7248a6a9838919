//! # Artifact Loader
//!
//! Lowers a JSON Schema (draft-07) artifact into an [`EntityShape`].
//!
//! An artifact must first compile as a draft-07 schema. The root must be
//! an object schema carrying `title` (the shape name) and `version`. The
//! lowering understands the subset of keywords the validator enforces:
//!
//! | Keyword                    | Lowered to                               |
//! |----------------------------|------------------------------------------|
//! | `type` (string or list)    | scalar kinds, `Object`, `Array`, `AnyOf` |
//! | `format`                   | `uri` → `Url`, `date-time`, `date`       |
//! | `enum`, `const` (strings)  | `Enumeration`                            |
//! | `anyOf`, `oneOf`           | `AnyOf`                                  |
//! | `properties`, `required`   | nested shape fields                      |
//! | `items`                    | array element type                       |
//! | `$ref: "#/definitions/X"`  | the definition, named `X`                |
//!
//! Keywords that would constrain documents in ways the validator cannot
//! express (`allOf`, `not`, conditionals, pattern properties) are rejected
//! rather than silently ignored. Annotation keywords are ignored.

use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::registry::RegistryError;
use crate::shape::{EntityShape, FieldType};

/// Maximum `$ref` / combinator nesting while lowering one artifact.
const MAX_DEPTH: usize = 64;

/// Keywords whose constraints cannot be lowered.
const UNSUPPORTED_KEYWORDS: [&str; 7] = [
    "allOf",
    "not",
    "if",
    "then",
    "else",
    "patternProperties",
    "dependencies",
];

/// Failure to turn an artifact into a registered shape.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// Reading a schema file or directory failed.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File or directory path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Artifact text is not JSON.
    #[error("{source_name}: invalid JSON: {source}")]
    Json {
        /// Artifact file name.
        source_name: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Artifact is JSON but not a usable schema.
    #[error("{source_name}: invalid schema: {reason}")]
    InvalidSchema {
        /// Artifact file name.
        source_name: String,
        /// What is wrong.
        reason: String,
    },

    /// Artifact uses a keyword the lowering does not support.
    #[error("{source_name}: unsupported keyword '{keyword}' at '{pointer}'")]
    Unsupported {
        /// Artifact file name.
        source_name: String,
        /// JSON Pointer to the offending schema node.
        pointer: String,
        /// Keyword (or `format: value`).
        keyword: String,
    },

    /// The lowered shape could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Parse artifact text and lower it to a shape.
pub fn parse_artifact(source_name: &str, text: &str) -> Result<EntityShape, SchemaLoadError> {
    let schema: Value = serde_json::from_str(text).map_err(|source| SchemaLoadError::Json {
        source_name: source_name.to_string(),
        source,
    })?;
    shape_from_schema(source_name, &schema)
}

/// Lower an already-parsed artifact to a shape.
pub fn shape_from_schema(source_name: &str, schema: &Value) -> Result<EntityShape, SchemaLoadError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft7);
    opts.build(schema).map_err(|e| SchemaLoadError::InvalidSchema {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })?;

    let lowering = Lowering {
        source_name,
        root: schema,
        version: "",
    };
    let root = lowering.object_node(schema, "")?;
    let title = root_string(&lowering, root, "title")?;
    let version = root_string(&lowering, root, "version")?;
    if let Some(t) = root.get("type") {
        if t.as_str() != Some("object") {
            return Err(lowering.invalid("root schema must have type \"object\""));
        }
    }

    let lowering = Lowering { version, ..lowering };
    let shape = lowering.object_shape(title, root, "", 0)?;
    tracing::trace!(
        source = source_name,
        shape = %shape.key(),
        required = shape.required().len(),
        "lowered schema artifact"
    );
    Ok(shape)
}

fn root_string<'a>(
    lowering: &Lowering<'_>,
    root: &'a Map<String, Value>,
    keyword: &str,
) -> Result<&'a str, SchemaLoadError> {
    root.get(keyword)
        .and_then(Value::as_str)
        .ok_or_else(|| lowering.invalid(format!("root schema needs a string '{keyword}'")))
}

struct Lowering<'a> {
    source_name: &'a str,
    root: &'a Value,
    version: &'a str,
}

impl<'a> Lowering<'a> {
    fn invalid(&self, reason: impl Into<String>) -> SchemaLoadError {
        SchemaLoadError::InvalidSchema {
            source_name: self.source_name.to_string(),
            reason: reason.into(),
        }
    }

    fn unsupported(&self, pointer: &str, keyword: impl Into<String>) -> SchemaLoadError {
        SchemaLoadError::Unsupported {
            source_name: self.source_name.to_string(),
            pointer: pointer.to_string(),
            keyword: keyword.into(),
        }
    }

    fn object_node<'v>(
        &self,
        node: &'v Value,
        pointer: &str,
    ) -> Result<&'v Map<String, Value>, SchemaLoadError> {
        node.as_object()
            .ok_or_else(|| self.invalid(format!("schema at '{pointer}' is not an object")))
    }

    fn object_shape(
        &self,
        name: &str,
        node: &Map<String, Value>,
        pointer: &str,
        depth: usize,
    ) -> Result<EntityShape, SchemaLoadError> {
        let mut shape = EntityShape::new(name, self.version);

        if let Some(properties) = node.get("properties") {
            let properties = self.object_node(properties, &format!("{pointer}/properties"))?;
            for (field, sub) in properties {
                let sub_pointer = format!("{pointer}/properties/{}", escape_pointer(field));
                let field_type = self.field_type(field, sub, &sub_pointer, depth + 1)?;
                shape = shape.field(field.as_str(), field_type);
            }
        }

        if let Some(required) = node.get("required") {
            let required = required
                .as_array()
                .ok_or_else(|| self.invalid(format!("'required' at '{pointer}' is not an array")))?;
            for field in required {
                let field = field.as_str().ok_or_else(|| {
                    self.invalid(format!("'required' at '{pointer}' holds a non-string"))
                })?;
                shape = shape.require(field);
            }
        }

        Ok(shape)
    }

    fn field_type(
        &self,
        name_hint: &str,
        node: &Value,
        pointer: &str,
        depth: usize,
    ) -> Result<FieldType, SchemaLoadError> {
        if depth > MAX_DEPTH {
            return Err(self.invalid(format!("nesting deeper than {MAX_DEPTH} at '{pointer}'")));
        }
        if node == &Value::Bool(true) {
            return Ok(FieldType::Any);
        }
        let map = self.object_node(node, pointer)?;

        if let Some(keyword) = UNSUPPORTED_KEYWORDS.iter().find(|k| map.contains_key(**k)) {
            return Err(self.unsupported(pointer, *keyword));
        }

        if let Some(reference) = map.get("$ref") {
            let definition = reference
                .as_str()
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .ok_or_else(|| self.unsupported(pointer, format!("$ref: {reference}")))?;
            let target = self
                .root
                .get("definitions")
                .and_then(|d| d.get(definition))
                .ok_or_else(|| self.invalid(format!("unresolved $ref '{reference}' at '{pointer}'")))?;
            let target_pointer = format!("/definitions/{}", escape_pointer(definition));
            return self.field_type(definition, target, &target_pointer, depth + 1);
        }

        if let Some(alternatives) = map.get("anyOf").or_else(|| map.get("oneOf")) {
            let keyword = if map.contains_key("anyOf") { "anyOf" } else { "oneOf" };
            let alternatives = alternatives
                .as_array()
                .ok_or_else(|| self.invalid(format!("'{keyword}' at '{pointer}' is not an array")))?;
            return alternatives
                .iter()
                .enumerate()
                .map(|(i, alt)| {
                    self.field_type(name_hint, alt, &format!("{pointer}/{keyword}/{i}"), depth + 1)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldType::AnyOf);
        }

        if let Some(value) = map.get("const") {
            let value = value
                .as_str()
                .ok_or_else(|| self.unsupported(pointer, "const (non-string)"))?;
            return Ok(FieldType::Enumeration(vec![value.to_string()]));
        }

        if let Some(values) = map.get("enum") {
            let values = values
                .as_array()
                .ok_or_else(|| self.invalid(format!("'enum' at '{pointer}' is not an array")))?;
            return values
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.unsupported(pointer, "enum (non-string)"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldType::Enumeration);
        }

        match map.get("type") {
            None if map.contains_key("properties") => self.typed("object", name_hint, map, pointer, depth),
            None => Ok(FieldType::Any),
            Some(Value::String(t)) => self.typed(t, name_hint, map, pointer, depth),
            Some(Value::Array(types)) => types
                .iter()
                .map(|t| {
                    t.as_str()
                        .ok_or_else(|| self.invalid(format!("'type' list at '{pointer}' holds a non-string")))
                        .and_then(|t| self.typed(t, name_hint, map, pointer, depth))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldType::AnyOf),
            Some(other) => Err(self.invalid(format!("'type' at '{pointer}' is {other}"))),
        }
    }

    fn typed(
        &self,
        type_name: &str,
        name_hint: &str,
        map: &Map<String, Value>,
        pointer: &str,
        depth: usize,
    ) -> Result<FieldType, SchemaLoadError> {
        match type_name {
            "string" => match map.get("format").and_then(Value::as_str) {
                None => Ok(FieldType::Text),
                Some("uri") | Some("url") => Ok(FieldType::Url),
                Some("date-time") => Ok(FieldType::DateTime),
                Some("date") => Ok(FieldType::Date),
                Some(other) => Err(self.unsupported(pointer, format!("format: {other}"))),
            },
            "number" => Ok(FieldType::Number),
            "integer" => Ok(FieldType::Integer),
            "boolean" => Ok(FieldType::Boolean),
            "object" => {
                let name = map.get("title").and_then(Value::as_str).unwrap_or(name_hint);
                self.object_shape(name, map, pointer, depth)
                    .map(|shape| FieldType::Object(Box::new(shape)))
            }
            "array" => {
                let item = match map.get("items") {
                    Some(items) => self.field_type(name_hint, items, &format!("{pointer}/items"), depth + 1)?,
                    None => FieldType::Any,
                };
                Ok(FieldType::Array(Box::new(item)))
            }
            other => Err(self.unsupported(pointer, format!("type: {other}"))),
        }
    }
}

/// Escape a JSON Pointer reference token (`~` → `~0`, `/` → `~1`).
pub(crate) fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lower(schema: Value) -> Result<EntityShape, SchemaLoadError> {
        shape_from_schema("test.schema.json", &schema)
    }

    fn base(properties: Value) -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "Test",
            "version": "1.0.0",
            "type": "object",
            "properties": properties,
        })
    }

    #[test]
    fn scalar_types_and_formats_lower() {
        let shape = lower(base(json!({
            "a": { "type": "string" },
            "b": { "type": "string", "format": "uri" },
            "c": { "type": "string", "format": "date-time" },
            "d": { "type": "string", "format": "date" },
            "e": { "type": "number" },
            "f": { "type": "integer" },
            "g": { "type": "boolean" },
            "h": {},
        })))
        .unwrap();
        let types: Vec<&FieldType> = shape.fields().iter().map(|(_, t)| t).collect();
        assert_eq!(
            types,
            vec![
                &FieldType::Text,
                &FieldType::Url,
                &FieldType::DateTime,
                &FieldType::Date,
                &FieldType::Number,
                &FieldType::Integer,
                &FieldType::Boolean,
                &FieldType::Any,
            ]
        );
    }

    #[test]
    fn type_list_lowers_to_any_of() {
        let shape = lower(base(json!({ "n": { "type": ["number", "string"] } }))).unwrap();
        assert_eq!(
            shape.field_type("n"),
            Some(&FieldType::AnyOf(vec![FieldType::Number, FieldType::Text]))
        );
    }

    #[test]
    fn refs_resolve_and_name_nested_shapes() {
        let mut schema = base(json!({ "publisher": { "$ref": "#/definitions/Organization" } }));
        schema["definitions"] = json!({
            "Organization": {
                "type": "object",
                "required": ["@type"],
                "properties": { "@type": { "const": "Organization" } }
            }
        });
        let shape = lower(schema).unwrap();
        let Some(FieldType::Object(nested)) = shape.field_type("publisher") else {
            panic!("publisher should lower to an object");
        };
        assert_eq!(nested.name(), "Organization");
        assert_eq!(nested.version(), "1.0.0");
        assert_eq!(nested.required(), ["@type".to_string()]);
        assert_eq!(
            nested.field_type("@type"),
            Some(&FieldType::Enumeration(vec!["Organization".to_string()]))
        );
    }

    #[test]
    fn required_order_is_kept() {
        let mut schema = base(json!({}));
        schema["required"] = json!(["@context", "@type", "headline"]);
        let shape = lower(schema).unwrap();
        assert_eq!(shape.required(), ["@context", "@type", "headline"]);
    }

    #[test]
    fn missing_title_or_version_is_invalid() {
        let mut schema = base(json!({}));
        schema.as_object_mut().unwrap().remove("version");
        assert!(matches!(lower(schema), Err(SchemaLoadError::InvalidSchema { .. })));

        let mut schema = base(json!({}));
        schema.as_object_mut().unwrap().remove("title");
        assert!(matches!(lower(schema), Err(SchemaLoadError::InvalidSchema { .. })));
    }

    #[test]
    fn schema_that_does_not_compile_is_invalid() {
        let schema = base(json!({ "a": { "type": "no-such-type" } }));
        assert!(matches!(lower(schema), Err(SchemaLoadError::InvalidSchema { .. })));
    }

    #[test]
    fn unresolved_ref_is_invalid() {
        let schema = base(json!({ "a": { "$ref": "#/definitions/Missing" } }));
        assert!(matches!(lower(schema), Err(SchemaLoadError::InvalidSchema { .. })));
    }

    #[test]
    fn all_of_is_rejected_with_its_pointer() {
        let schema = base(json!({ "a": { "allOf": [{ "type": "string" }] } }));
        match lower(schema) {
            Err(SchemaLoadError::Unsupported { pointer, keyword, .. }) => {
                assert_eq!(pointer, "/properties/a");
                assert_eq!(keyword, "allOf");
            }
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        let schema = base(json!({ "a": { "type": "string", "format": "email" } }));
        assert!(matches!(lower(schema), Err(SchemaLoadError::Unsupported { .. })));
    }

    #[test]
    fn self_referencing_definition_hits_depth_limit() {
        let mut schema = base(json!({ "node": { "$ref": "#/definitions/Node" } }));
        schema["definitions"] = json!({
            "Node": { "type": "object", "properties": { "child": { "$ref": "#/definitions/Node" } } }
        });
        assert!(matches!(lower(schema), Err(SchemaLoadError::InvalidSchema { .. })));
    }

    #[test]
    fn bad_json_is_reported_with_source_name() {
        let err = parse_artifact("broken.schema.json", "{ not json").unwrap_err();
        assert!(err.to_string().starts_with("broken.schema.json: invalid JSON"));
    }

    #[test]
    fn pointer_tokens_are_escaped() {
        assert_eq!(escape_pointer("a/b~c"), "a~1b~0c");
    }
}
