//! # ldgen-cli — Command-Line Interface
//!
//! Provides the `ldgen` binary.
//!
//! ## Subcommands
//!
//! - `ldgen render <page>` — build, compose and emit the script blocks of a
//!   page config.
//! - `ldgen validate --schema <name> --version <v> <file>` — check extracted
//!   JSON-LD documents against a registered shape.
//! - `ldgen schemas list|show` — inspect the registry.
//! - `ldgen sample` — emit the ten-block reference page.
//!
//! ```bash
//! ldgen render page.yaml > head.html
//! ldgen validate --schema Product --version 1.0.0 blocks.json --index 6
//! ldgen --config ldgen.yaml schemas list
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives beside each handler; handlers return the
//!   process exit code and delegate to `ldgen-core` / `ldgen-schema`.
//! - Printing happens only in `run_*` handlers; the helpers they call
//!   return strings so tests can inspect output.

pub mod config;
pub mod render;
pub mod sample;
pub mod schemas;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

/// Read a JSON or YAML file into a JSON value. `.yaml` / `.yml` files are
/// parsed as YAML, everything else as JSON.
pub fn read_value(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display())),
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display())),
    }
}
