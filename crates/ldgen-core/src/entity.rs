//! # Entities — Typed schema.org Nodes
//!
//! [`SchemaType`] is the closed set of schema.org types this crate can
//! build. [`LdEntity`] is one built instance: a type tag plus its fields in
//! insertion order.
//!
//! ## Invariant
//!
//! `LdEntity` values only come out of [`EntityBuilder::build()`]
//! (crate::EntityBuilder::build), so every entity satisfies its catalog
//! entry and its `@type` always equals `schema_type`. There are no
//! mutators; rebuilding is the only way to change one.

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::BuildError;
use crate::value::LdValue;

/// A schema.org type supported by the builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaType {
    Article,
    NewsArticle,
    Blog,
    BlogPosting,
    Course,
    BreadcrumbList,
    ListItem,
    WebPage,
    Organization,
    Person,
    ImageObject,
    LocalBusiness,
    Store,
    PostalAddress,
    GeoCoordinates,
    Product,
    Thing,
    Brand,
    Review,
    Rating,
    AggregateRating,
    Offer,
    ContactPoint,
}

impl SchemaType {
    /// Every supported type, in declaration order.
    pub const ALL: [SchemaType; 23] = [
        SchemaType::Article,
        SchemaType::NewsArticle,
        SchemaType::Blog,
        SchemaType::BlogPosting,
        SchemaType::Course,
        SchemaType::BreadcrumbList,
        SchemaType::ListItem,
        SchemaType::WebPage,
        SchemaType::Organization,
        SchemaType::Person,
        SchemaType::ImageObject,
        SchemaType::LocalBusiness,
        SchemaType::Store,
        SchemaType::PostalAddress,
        SchemaType::GeoCoordinates,
        SchemaType::Product,
        SchemaType::Thing,
        SchemaType::Brand,
        SchemaType::Review,
        SchemaType::Rating,
        SchemaType::AggregateRating,
        SchemaType::Offer,
        SchemaType::ContactPoint,
    ];

    /// The schema.org type name emitted as `@type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Article => "Article",
            SchemaType::NewsArticle => "NewsArticle",
            SchemaType::Blog => "Blog",
            SchemaType::BlogPosting => "BlogPosting",
            SchemaType::Course => "Course",
            SchemaType::BreadcrumbList => "BreadcrumbList",
            SchemaType::ListItem => "ListItem",
            SchemaType::WebPage => "WebPage",
            SchemaType::Organization => "Organization",
            SchemaType::Person => "Person",
            SchemaType::ImageObject => "ImageObject",
            SchemaType::LocalBusiness => "LocalBusiness",
            SchemaType::Store => "Store",
            SchemaType::PostalAddress => "PostalAddress",
            SchemaType::GeoCoordinates => "GeoCoordinates",
            SchemaType::Product => "Product",
            SchemaType::Thing => "Thing",
            SchemaType::Brand => "Brand",
            SchemaType::Review => "Review",
            SchemaType::Rating => "Rating",
            SchemaType::AggregateRating => "AggregateRating",
            SchemaType::Offer => "Offer",
            SchemaType::ContactPoint => "ContactPoint",
        }
    }

    /// Start a builder for this type.
    pub fn builder(self) -> crate::EntityBuilder {
        crate::EntityBuilder::new(self)
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BuildError::UnknownType(s.to_string()))
    }
}

/// One built schema.org entity.
#[derive(Debug, Clone, PartialEq)]
pub struct LdEntity {
    schema_type: SchemaType,
    fields: Vec<(String, LdValue)>,
}

impl LdEntity {
    /// Only the builder may assemble entities.
    pub(crate) fn from_checked_parts(schema_type: SchemaType, fields: Vec<(String, LdValue)>) -> Self {
        Self { schema_type, fields }
    }

    /// The entity's schema.org type; serialized as `@type`.
    pub fn schema_type(&self) -> SchemaType {
        self.schema_type
    }

    /// Fields in insertion order, excluding `@type`.
    pub fn fields(&self) -> &[(String, LdValue)] {
        &self.fields
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&LdValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Convert to a `serde_json::Value` tree (`@type` first).
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::with_capacity(self.fields.len() + 1);
        map.insert("@type".to_string(), serde_json::Value::from(self.schema_type.as_str()));
        for (k, v) in &self.fields {
            map.insert(k.clone(), v.to_json());
        }
        serde_json::Value::Object(map)
    }

    /// Write `@type` and every field into an open map. Shared with
    /// [`LdDocument`](crate::LdDocument), which prepends `@context`.
    pub(crate) fn serialize_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry("@type", self.schema_type.as_str())?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        Ok(())
    }
}

impl Serialize for LdEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        self.serialize_entries(&mut map)?;
        map.end()
    }
}
