//! # ldgen-schema — Schema Registry & Validator
//!
//! Versioned schema.org shapes and the collecting validator that checks
//! JSON-LD documents against them.
//!
//! ## Layout
//!
//! - [`shape`] — [`EntityShape`] and [`FieldType`], the validator's model of
//!   one schema.org type at one version.
//! - [`loader`] — lowers JSON Schema (draft-07) artifacts into shapes.
//! - [`registry`] — [`SchemaRegistry`] keyed by `(name, version)`, the
//!   embedded builtin artifacts, and the process-wide [`install`] /
//!   [`installed`] pair.
//! - [`validate`](mod@validate) — [`Validator`] and [`ValidationResult`].
//!
//! ## Lifecycle
//!
//! Build a registry (usually [`SchemaRegistry::builtin`] plus
//! [`SchemaRegistry::load_dir`]), [`install`] it once, then call
//! [`validate()`] from anywhere. Tests and tools that need isolation can
//! skip the global and use [`Validator::new`] over their own registry.
//!
//! ## Crate Policy
//!
//! - Depends on `ldgen-core` only for [`LdDocument`](ldgen_core::LdDocument)
//!   convenience validation and the shared context constants.
//! - A non-conforming document is never an `Err`; only a missing shape is.

pub mod loader;
pub mod registry;
pub mod shape;
pub mod validate;

pub use loader::{parse_artifact, shape_from_schema, SchemaLoadError};
pub use registry::{install, installed, RegistryError, SchemaRegistry, ARTIFACT_SUFFIX};
pub use shape::{EntityShape, FieldType, ShapeKey};
pub use validate::{validate, ValidateError, ValidationResult, Validator, Violation, ViolationKind};

#[cfg(test)]
mod tests {
    use super::*;
    use ldgen_core::SCHEMA_ORG_CONTEXTS;

    #[test]
    fn builtin_context_enumeration_matches_core_spellings() {
        let registry = SchemaRegistry::builtin().unwrap();
        let expected = FieldType::Enumeration(SCHEMA_ORG_CONTEXTS.iter().map(|c| c.to_string()).collect());
        for shape in registry.shapes() {
            assert_eq!(
                shape.field_type("@context"),
                Some(&expected),
                "{} does not accept every schema.org context spelling",
                shape.key()
            );
            assert_eq!(&shape.required()[..2], ["@context", "@type"], "{}", shape.key());
        }
    }
}
