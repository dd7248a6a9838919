//! # Entity Builders
//!
//! [`EntityBuilder`] is the only way to produce an [`LdEntity`]. The
//! builder is driven by the type's [`catalog`] entry, so "one builder per
//! schema.org type" is one catalog entry per [`SchemaType`] plus this
//! shared checking logic.
//!
//! ## Build Order
//!
//! `build()` checks, stopping at the first failure:
//!
//! 1. every set field is in the type's field set (`UnrecognizedField`);
//! 2. every value has an accepted kind and multiplicity (`InvalidValue`);
//! 3. every required field was set (`MissingField`);
//! 4. type-specific rules (breadcrumb positions run `1..=n`).
//!
//! `@type` is fixed by the builder. Setting `@type` or `@context` is an
//! unrecognized field.

pub mod catalog;

use serde_json::Value;

use crate::entity::{LdEntity, SchemaType};
use crate::error::BuildError;
use crate::value::LdValue;

use self::catalog::{EntityDefinition, FieldSpec, Multiplicity, ValueKind};

/// Collects fields for one entity and checks them on [`build()`](Self::build).
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    definition: &'static EntityDefinition,
    fields: Vec<(String, LdValue)>,
}

impl EntityBuilder {
    /// Start building an entity of the given type.
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            definition: catalog::definition(schema_type),
            fields: Vec::new(),
        }
    }

    /// The type this builder produces.
    pub fn schema_type(&self) -> SchemaType {
        self.definition.schema_type
    }

    /// Set a field. Fields serialize in the order they were first set;
    /// setting a field again replaces its value in place.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<LdValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// Set a field only when a value is present.
    pub fn set_opt<V: Into<LdValue>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(name, v),
            None => self,
        }
    }

    /// Check every field and produce the entity.
    pub fn build(self) -> Result<LdEntity, BuildError> {
        let def = self.definition;
        let entity = def.schema_type;

        let mut specs = Vec::with_capacity(self.fields.len());
        for (name, _) in &self.fields {
            let spec = def.field(name).ok_or_else(|| BuildError::UnrecognizedField {
                entity,
                field: name.clone(),
            })?;
            specs.push(spec);
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        for ((name, value), spec) in self.fields.into_iter().zip(specs) {
            let value = admit_field(entity, spec, value)?;
            fields.push((name, value));
        }

        if let Some(missing) = def
            .required()
            .find(|spec| !fields.iter().any(|(k, _)| k == spec.name))
        {
            return Err(BuildError::MissingField {
                entity,
                field: missing.name.to_string(),
            });
        }

        if entity == SchemaType::BreadcrumbList {
            check_breadcrumb_positions(&fields)?;
        }

        Ok(LdEntity::from_checked_parts(entity, fields))
    }
}

/// Build a `BreadcrumbList` from `(id, name)` crumbs, numbering positions
/// `1..=n` in the order supplied.
pub fn breadcrumb_list<I, S, N>(crumbs: I) -> Result<LdEntity, BuildError>
where
    I: IntoIterator<Item = (S, N)>,
    S: Into<String>,
    N: AsRef<str>,
{
    let items = crumbs
        .into_iter()
        .enumerate()
        .map(|(i, (id, name))| {
            SchemaType::ListItem
                .builder()
                .set("position", i + 1)
                .set("item", LdValue::reference(id, Some(name.as_ref())))
                .build()
                .map(LdValue::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    SchemaType::BreadcrumbList
        .builder()
        .set("itemListElement", LdValue::List(items))
        .build()
}

/// Build an entity from a JSON config object such as
/// `{"@type": "Organization", "url": "..."}`.
///
/// Nested objects with a `@type` are built through their own builder;
/// objects without one are kept as untyped nodes. `null` fields are
/// skipped.
pub fn entity_from_json(config: &Value) -> Result<LdEntity, BuildError> {
    let obj = config.as_object().ok_or(BuildError::UntypedEntity)?;
    let type_name = obj
        .get("@type")
        .and_then(Value::as_str)
        .ok_or(BuildError::UntypedEntity)?;
    let schema_type: SchemaType = type_name.parse()?;

    let mut builder = schema_type.builder();
    for (name, value) in obj {
        if name == "@type" {
            continue;
        }
        if let Some(value) = value_from_json(value)? {
            builder = builder.set(name.as_str(), value);
        }
    }
    builder.build()
}

/// `None` for `null`, which is treated as absent at every level.
fn value_from_json(value: &Value) -> Result<Option<LdValue>, BuildError> {
    let value = match value {
        Value::Null => return Ok(None),
        Value::String(s) => LdValue::Text(s.clone()),
        Value::Number(n) => LdValue::Number(n.clone()),
        Value::Bool(b) => LdValue::Bool(*b),
        Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                list.extend(value_from_json(item)?);
            }
            LdValue::List(list)
        }
        Value::Object(obj) if obj.contains_key("@type") => LdValue::from(entity_from_json(value)?),
        Value::Object(obj) => {
            let mut entries = Vec::with_capacity(obj.len());
            for (key, v) in obj {
                if let Some(v) = value_from_json(v)? {
                    entries.push((key.clone(), v));
                }
            }
            LdValue::Node(entries)
        }
    };
    Ok(Some(value))
}

/// Why a single value was turned away.
enum Rejection {
    /// No accepted kind matches; the value is handed back for the message.
    Kind(LdValue),
    /// A node reference carries a key other than `@id` and `name`.
    UnknownKey(String),
}

fn admit_field(entity: SchemaType, spec: &FieldSpec, value: LdValue) -> Result<LdValue, BuildError> {
    let invalid = |expected: String, found: &LdValue| BuildError::InvalidValue {
        entity,
        field: spec.name.to_string(),
        expected,
        found: found.kind_name().to_string(),
    };
    let reject = |rejection: Rejection| match rejection {
        Rejection::Kind(v) => invalid(describe_kinds(spec.kinds), &v),
        Rejection::UnknownKey(key) => BuildError::UnrecognizedField {
            entity,
            field: format!("{}.{key}", spec.name),
        },
    };

    match (spec.multiplicity, value) {
        (Multiplicity::One, v @ LdValue::List(_)) => Err(invalid(describe_kinds(spec.kinds), &v)),
        (Multiplicity::Many, v) if !matches!(v, LdValue::List(_)) => {
            Err(invalid(format!("a list of {}", describe_kinds(spec.kinds)), &v))
        }
        (_, LdValue::List(items)) => items
            .into_iter()
            .map(|item| admit_one(spec.kinds, item).map_err(&reject))
            .collect::<Result<Vec<_>, _>>()
            .map(LdValue::List),
        (_, v) => admit_one(spec.kinds, v).map_err(&reject),
    }
}

/// Try each kind in order; hand the value back if none accepts it.
fn admit_one(kinds: &[ValueKind], mut value: LdValue) -> Result<LdValue, Rejection> {
    for kind in kinds {
        match admit(*kind, value) {
            Ok(v) => return Ok(v),
            Err(Rejection::Kind(v)) => value = v,
            Err(other) => return Err(other),
        }
    }
    Err(Rejection::Kind(value))
}

fn admit(kind: ValueKind, value: LdValue) -> Result<LdValue, Rejection> {
    match (kind, value) {
        (ValueKind::Text, v @ (LdValue::Text(_) | LdValue::Url(_))) => Ok(v),
        (ValueKind::Url, LdValue::Text(s) | LdValue::Url(s)) if is_absolute_url(&s) => Ok(LdValue::Url(s)),
        (ValueKind::Url, LdValue::Url(s)) => Err(Rejection::Kind(LdValue::Text(s))),
        (ValueKind::DateTime | ValueKind::Date, v @ LdValue::Text(_)) => Ok(v),
        (ValueKind::Number, v @ (LdValue::Number(_) | LdValue::Text(_))) => Ok(v),
        (ValueKind::Integer, LdValue::Number(n)) if n.is_i64() || n.is_u64() => Ok(LdValue::Number(n)),
        (ValueKind::Entity(types), LdValue::Entity(e)) if types.contains(&e.schema_type()) => {
            Ok(LdValue::Entity(e))
        }
        (ValueKind::Reference, LdValue::Node(entries)) => admit_reference(entries),
        (_, v) => Err(Rejection::Kind(v)),
    }
}

/// A node reference is `{ "@id": <absolute URL>, "name"?: <text> }`; the
/// id is promoted to `Url` in place.
fn admit_reference(mut entries: Vec<(String, LdValue)>) -> Result<LdValue, Rejection> {
    if let Some((key, _)) = entries.iter().find(|(k, _)| k != "@id" && k != "name") {
        return Err(Rejection::UnknownKey(key.clone()));
    }
    let id_ok = entries
        .iter()
        .find(|(k, _)| k == "@id")
        .and_then(|(_, v)| v.as_str())
        .is_some_and(is_absolute_url);
    let name_ok = entries
        .iter()
        .filter(|(k, _)| k == "name")
        .all(|(_, v)| v.as_str().is_some());
    if !(id_ok && name_ok) {
        return Err(Rejection::Kind(LdValue::Node(entries)));
    }
    for (k, v) in entries.iter_mut() {
        if k == "@id" {
            if let LdValue::Text(s) = v {
                *v = LdValue::Url(std::mem::take(s));
            }
        }
    }
    Ok(LdValue::Node(entries))
}

fn check_breadcrumb_positions(fields: &[(String, LdValue)]) -> Result<(), BuildError> {
    let Some((_, LdValue::List(items))) = fields.iter().find(|(k, _)| k == "itemListElement") else {
        return Ok(());
    };
    for (i, item) in items.iter().enumerate() {
        let expected = i as u64 + 1;
        let position = item
            .as_entity()
            .and_then(|e| e.get("position"))
            .and_then(|p| match p {
                LdValue::Number(n) => n.as_u64(),
                _ => None,
            });
        if position != Some(expected) {
            return Err(BuildError::InvalidValue {
                entity: SchemaType::BreadcrumbList,
                field: format!("itemListElement[{i}].position"),
                expected: format!("position {expected}"),
                found: position.map_or_else(|| "no position".to_string(), |p| format!("position {p}")),
            });
        }
    }
    Ok(())
}

fn describe_kinds(kinds: &[ValueKind]) -> String {
    kinds
        .iter()
        .map(ValueKind::describe)
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Absolute URL syntax check. The text itself is never rewritten.
pub(crate) fn is_absolute_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}
