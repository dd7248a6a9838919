//! # Schema Registry
//!
//! Holds [`EntityShape`]s keyed by `(name, version)`. A registry is
//! assembled at startup (builtin artifacts, then any extra schema
//! directories), installed process-wide with [`install`], and read-only
//! from then on. [`installed`] hands out `&'static` access, so concurrent
//! validations share it without locking.
//!
//! ## Builtin Artifacts
//!
//! The ten reference artifacts under the workspace `schemas/` directory are
//! embedded at compile time and loaded by [`SchemaRegistry::builtin`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use thiserror::Error;

use crate::loader::{self, SchemaLoadError};
use crate::shape::{EntityShape, ShapeKey};

/// Artifacts compiled into the binary, by file name.
const BUILTIN_ARTIFACTS: [(&str, &str); 10] = [
    ("article.schema.json", include_str!("../../../schemas/article.schema.json")),
    ("breadcrumb.schema.json", include_str!("../../../schemas/breadcrumb.schema.json")),
    ("blog.schema.json", include_str!("../../../schemas/blog.schema.json")),
    ("course.schema.json", include_str!("../../../schemas/course.schema.json")),
    (
        "local-business.schema.json",
        include_str!("../../../schemas/local-business.schema.json"),
    ),
    ("logo.schema.json", include_str!("../../../schemas/logo.schema.json")),
    ("product.schema.json", include_str!("../../../schemas/product.schema.json")),
    (
        "social-profile.schema.json",
        include_str!("../../../schemas/social-profile.schema.json"),
    ),
    (
        "corporate-contact.schema.json",
        include_str!("../../../schemas/corporate-contact.schema.json"),
    ),
    ("news-article.schema.json", include_str!("../../../schemas/news-article.schema.json")),
];

/// File suffix of schema artifacts in a schema directory.
pub const ARTIFACT_SUFFIX: &str = ".schema.json";

/// Registry failures. Validation of a document never produces these except
/// [`RegistryError::UnknownShape`] and [`RegistryError::NotInstalled`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A shape with the same name and version is already registered.
    #[error("shape {0} is already registered")]
    DuplicateShape(ShapeKey),

    /// No shape with this name and version.
    #[error("no shape registered for {0}")]
    UnknownShape(ShapeKey),

    /// Version string is not `MAJOR.MINOR.PATCH`.
    #[error("shape '{name}' has invalid version '{version}': expected MAJOR.MINOR.PATCH")]
    InvalidVersion {
        /// Shape name.
        name: String,
        /// Rejected version string.
        version: String,
    },

    /// [`install`] was called more than once.
    #[error("a schema registry is already installed")]
    AlreadyInstalled,

    /// [`installed`] was called before [`install`].
    #[error("no schema registry has been installed")]
    NotInstalled,
}

/// Shapes keyed by name and version.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    shapes: BTreeMap<ShapeKey, EntityShape>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the embedded reference artifacts.
    pub fn builtin() -> Result<Self, SchemaLoadError> {
        let mut registry = Self::new();
        for (source, text) in BUILTIN_ARTIFACTS {
            registry.load_artifact(source, text)?;
        }
        tracing::debug!(shapes = registry.len(), "loaded builtin schema artifacts");
        Ok(registry)
    }

    /// Add a shape.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidVersion`] if the version is not
    /// `MAJOR.MINOR.PATCH`, [`RegistryError::DuplicateShape`] if the key is
    /// taken. The registry is unchanged on error.
    pub fn register(&mut self, shape: EntityShape) -> Result<(), RegistryError> {
        if !is_semver(shape.version()) {
            return Err(RegistryError::InvalidVersion {
                name: shape.name().to_string(),
                version: shape.version().to_string(),
            });
        }
        let key = shape.key();
        if self.shapes.contains_key(&key) {
            return Err(RegistryError::DuplicateShape(key));
        }
        tracing::trace!(shape = %key, fields = shape.fields().len(), "registered shape");
        self.shapes.insert(key, shape);
        Ok(())
    }

    /// Parse one artifact's text and register the resulting shape.
    pub fn load_artifact(&mut self, source: &str, text: &str) -> Result<ShapeKey, SchemaLoadError> {
        let shape = loader::parse_artifact(source, text)?;
        let key = shape.key();
        self.register(shape)?;
        Ok(key)
    }

    /// Register every `*.schema.json` artifact in `dir`, in file-name order.
    /// Other files are skipped with a warning. Returns how many shapes were
    /// added.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, SchemaLoadError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| SchemaLoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SchemaLoadError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            paths.push(entry.path());
        }
        paths.sort();

        let mut added = 0;
        for path in paths {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_file() {
                continue;
            }
            if !file_name.ends_with(ARTIFACT_SUFFIX) {
                tracing::warn!(path = %path.display(), "skipping non-artifact file in schema directory");
                continue;
            }
            let text = std::fs::read_to_string(&path).map_err(|source| SchemaLoadError::Io {
                path: path.clone(),
                source,
            })?;
            let key = self.load_artifact(file_name, &text)?;
            tracing::debug!(shape = %key, path = %path.display(), "loaded schema artifact");
            added += 1;
        }
        Ok(added)
    }

    /// The shape registered for `(name, version)`.
    pub fn lookup(&self, name: &str, version: &str) -> Result<&EntityShape, RegistryError> {
        let key = ShapeKey::new(name, version);
        self.shapes.get(&key).ok_or(RegistryError::UnknownShape(key))
    }

    /// Whether `(name, version)` is registered.
    pub fn contains(&self, name: &str, version: &str) -> bool {
        self.shapes.contains_key(&ShapeKey::new(name, version))
    }

    /// Number of registered shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Registered keys, sorted by name then version.
    pub fn keys(&self) -> impl Iterator<Item = &ShapeKey> {
        self.shapes.keys()
    }

    /// Registered shapes, in key order.
    pub fn shapes(&self) -> impl Iterator<Item = &EntityShape> {
        self.shapes.values()
    }
}

static INSTALLED: OnceLock<SchemaRegistry> = OnceLock::new();

/// Make `registry` the process-wide registry. Succeeds once per process.
pub fn install(registry: SchemaRegistry) -> Result<&'static SchemaRegistry, RegistryError> {
    let shapes = registry.len();
    INSTALLED
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    tracing::debug!(shapes, "installed schema registry");
    installed()
}

/// The process-wide registry.
pub fn installed() -> Result<&'static SchemaRegistry, RegistryError> {
    INSTALLED.get().ok_or(RegistryError::NotInstalled)
}

fn is_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}
