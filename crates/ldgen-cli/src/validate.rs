//! # Validate Subcommand
//!
//! Checks JSON-LD documents extracted from a page against a registered
//! shape. The input file holds either one document or an array of
//! documents in page order; `--index` picks one block out of an array.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde_json::Value;

use ldgen_schema::{SchemaRegistry, ValidationResult, Validator};

use crate::read_value;

/// Arguments for `ldgen validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Shape name, e.g. `Article` or `Local Business`.
    #[arg(long)]
    pub schema: String,

    /// Shape version.
    #[arg(long = "version", default_value = "1.0.0")]
    pub schema_version: String,

    /// Only validate the block at this position of an array file.
    #[arg(long)]
    pub index: Option<usize>,

    /// Document file (JSON or YAML).
    pub file: PathBuf,
}

/// Validate the selected documents. Returns `(index, result)` pairs in
/// page order; `index` is `None` for a single-document file.
pub fn validate_value(
    validator: &Validator<'_>,
    name: &str,
    version: &str,
    value: &Value,
    index: Option<usize>,
) -> Result<Vec<(Option<usize>, ValidationResult)>> {
    match (value, index) {
        (Value::Array(documents), Some(i)) => {
            let Some(document) = documents.get(i) else {
                bail!("index {i} is out of range: the file holds {} documents", documents.len());
            };
            Ok(vec![(Some(i), validator.validate(name, version, document)?)])
        }
        (Value::Array(documents), None) => documents
            .iter()
            .enumerate()
            .map(|(i, document)| -> Result<_> {
                Ok((Some(i), validator.validate(name, version, document)?))
            })
            .collect(),
        (_, Some(_)) => bail!("--index needs a file holding an array of documents"),
        (document, None) => Ok(vec![(None, validator.validate(name, version, document)?)]),
    }
}

/// Execute `ldgen validate`. Exit code 1 when any document is invalid.
pub fn run_validate(args: &ValidateArgs, registry: &SchemaRegistry) -> Result<u8> {
    let value = read_value(&args.file)?;
    let validator = Validator::new(registry);
    let results = validate_value(&validator, &args.schema, &args.schema_version, &value, args.index)?;

    let mut invalid = 0;
    for (index, result) in &results {
        let label = match index {
            Some(i) => format!("document {i}"),
            None => args.file.display().to_string(),
        };
        if result.valid() {
            println!("{label}: valid");
            continue;
        }
        invalid += 1;
        println!("{label}: {} violation(s)", result.errors().len());
        for violation in result.errors() {
            println!("  {violation}");
        }
    }

    tracing::info!(
        schema = %args.schema,
        version = %args.schema_version,
        checked = results.len(),
        invalid,
        "validation finished"
    );
    Ok(if invalid == 0 { 0 } else { 1 })
}
