//! # Error Types
//!
//! Builder errors are fatal to the build call: no partially-built entity is
//! ever observable. Serialization errors only surface if the underlying
//! writer fails.

use thiserror::Error;

use crate::entity::SchemaType;

/// Error raised while building an [`LdEntity`](crate::LdEntity).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The field is not part of this type's field set. `@type` and
    /// `@context` are always unrecognized: the builder owns them.
    #[error("{entity} does not recognize field '{field}'")]
    UnrecognizedField {
        /// Type being built.
        entity: SchemaType,
        /// Offending field name.
        field: String,
    },

    /// A required field was never set.
    #[error("{entity} is missing required field '{field}'")]
    MissingField {
        /// Type being built.
        entity: SchemaType,
        /// Name of the missing field.
        field: String,
    },

    /// A field value has the wrong kind or multiplicity.
    #[error("{entity}.{field} expects {expected}, got {found}")]
    InvalidValue {
        /// Type being built.
        entity: SchemaType,
        /// Field whose value was rejected.
        field: String,
        /// Description of the accepted kinds.
        expected: String,
        /// Description of the supplied value.
        found: String,
    },

    /// A config object named a `@type` outside the supported set.
    #[error("unsupported schema.org type '{0}'")]
    UnknownType(String),

    /// A config object used where an entity is required has no `@type`.
    #[error("entity config has no '@type' string")]
    UntypedEntity,
}

/// Error raised while serializing a document.
#[derive(Error, Debug)]
pub enum SerializeError {
    /// serde_json failed to write the document.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The writer produced bytes that are not UTF-8.
    #[error("serialized output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_field_message_names_type_and_field() {
        let err = BuildError::UnrecognizedField {
            entity: SchemaType::Organization,
            field: "colour".to_string(),
        };
        assert_eq!(err.to_string(), "Organization does not recognize field 'colour'");
    }
}
