//! # ldgen-core — Structured Data Values, Builders, and Serialization
//!
//! This crate is the leaf of the ldgen workspace. It models schema.org
//! entities as immutable values and turns them into JSON-LD text that can
//! be embedded in a `<script type="application/ld+json">` element.
//!
//! ## Pipeline
//!
//! 1. **Builders** (`builder`): one field catalog entry per [`SchemaType`].
//!    [`EntityBuilder`] checks field names, value kinds and required fields
//!    and produces an [`LdEntity`]. An entity is either fully valid or not
//!    produced at all.
//!
//! 2. **Composer** (`document`): [`compose()`] wraps a root entity in an
//!    [`LdDocument`] carrying exactly one `@context`. A [`Page`] keeps several
//!    independent documents in caller order.
//!
//! 3. **Serializer** (`serialize`): [`serialize()`] produces
//!    [`ScriptSafeJson`], the only text type accepted by [`script_tag()`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ldgen-*` crates.
//! - `LdEntity` has no public constructor outside the builder module.
//! - Field order is insertion order everywhere. Nothing is sorted.
//! - No `.unwrap()` outside tests.

pub mod builder;
pub mod document;
pub mod entity;
pub mod error;
pub mod serialize;
pub mod value;

pub use builder::{breadcrumb_list, entity_from_json, EntityBuilder};
pub use document::{compose, compose_default, LdDocument, Page, DEFAULT_CONTEXT, SCHEMA_ORG_CONTEXTS};
pub use entity::{LdEntity, SchemaType};
pub use error::{BuildError, SerializeError};
pub use serialize::{script_tag, serialize, serialize_pretty, ScriptSafeJson};
pub use value::LdValue;
