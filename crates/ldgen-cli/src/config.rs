//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! default_context: https://schema.org
//! builtin_schemas: true
//! schema_dirs:
//!   - schemas/extra
//! pretty: false
//! ```
//!
//! Every key is optional. Relative `schema_dirs` resolve against the
//! directory holding the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use ldgen_core::DEFAULT_CONTEXT;
use ldgen_schema::SchemaRegistry;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// `@context` for page documents that do not name one.
    pub default_context: String,
    /// Register the embedded reference artifacts.
    pub builtin_schemas: bool,
    /// Extra directories of `*.schema.json` artifacts.
    pub schema_dirs: Vec<PathBuf>,
    /// Pretty-print rendered JSON-LD.
    pub pretty: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_context: DEFAULT_CONTEXT.to_string(),
            builtin_schemas: true,
            schema_dirs: Vec::new(),
            pretty: false,
        }
    }
}

impl CliConfig {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: CliConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for dir in &mut config.schema_dirs {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// [`load`](Self::load) when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Assemble the registry these settings describe.
    pub fn build_registry(&self) -> Result<SchemaRegistry> {
        let mut registry = if self.builtin_schemas {
            SchemaRegistry::builtin().context("failed to load builtin schema artifacts")?
        } else {
            SchemaRegistry::new()
        };
        for dir in &self.schema_dirs {
            let added = registry
                .load_dir(dir)
                .with_context(|| format!("failed to load schemas from {}", dir.display()))?;
            tracing::info!(dir = %dir.display(), added, "loaded schema directory");
        }
        Ok(registry)
    }
}
