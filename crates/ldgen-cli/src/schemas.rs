//! # Schemas Subcommand
//!
//! Lists registered shapes and prints one shape's field contract.

use std::fmt::Write as _;

use anyhow::Result;
use clap::{Args, Subcommand};

use ldgen_schema::{EntityShape, FieldType, SchemaRegistry};

/// Arguments for `ldgen schemas`.
#[derive(Args, Debug)]
pub struct SchemasArgs {
    #[command(subcommand)]
    pub command: SchemasCommand,
}

/// Available schemas subcommands.
#[derive(Subcommand, Debug)]
pub enum SchemasCommand {
    /// List every registered shape.
    List,

    /// Print the required and declared fields of one shape.
    Show {
        /// Shape name.
        name: String,

        /// Shape version.
        #[arg(long = "version", default_value = "1.0.0")]
        schema_version: String,
    },
}

/// Execute `ldgen schemas`.
pub fn run_schemas(args: &SchemasArgs, registry: &SchemaRegistry) -> Result<u8> {
    match &args.command {
        SchemasCommand::List => {
            print!("{}", list_shapes(registry));
            Ok(0)
        }
        SchemasCommand::Show {
            name,
            schema_version,
        } => {
            let shape = registry.lookup(name, schema_version)?;
            print!("{}", describe_shape(shape));
            Ok(0)
        }
    }
}

/// One line per shape, in key order.
pub fn list_shapes(registry: &SchemaRegistry) -> String {
    let mut out = String::new();
    for shape in registry.shapes() {
        let _ = writeln!(
            out,
            "{:<20} {:<8} {} required, {} fields",
            shape.name(),
            shape.version(),
            shape.required().len(),
            shape.fields().len()
        );
    }
    let _ = writeln!(out, "Total: {} shapes", registry.len());
    out
}

/// The shape's fields, nested shapes indented beneath their field.
pub fn describe_shape(shape: &EntityShape) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", shape.name(), shape.version());
    write_fields(&mut out, shape, 1);
    out
}

fn write_fields(out: &mut String, shape: &EntityShape, depth: usize) {
    let indent = "  ".repeat(depth);
    for (name, field_type) in shape.fields() {
        let marker = if shape.required().contains(name) { " (required)" } else { "" };
        let _ = writeln!(out, "{indent}{name}: {field_type}{marker}");
        for nested in nested_shapes(field_type) {
            write_fields(out, nested, depth + 1);
        }
    }
    for name in shape.required() {
        if shape.field_type(name).is_none() {
            let _ = writeln!(out, "{indent}{name}: any value (required)");
        }
    }
}

fn nested_shapes(field_type: &FieldType) -> Vec<&EntityShape> {
    match field_type {
        FieldType::Object(shape) => vec![shape.as_ref()],
        FieldType::Array(item) => nested_shapes(item),
        FieldType::AnyOf(alternatives) => alternatives.iter().flat_map(nested_shapes).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_covers_every_builtin_shape() {
        let registry = SchemaRegistry::builtin().unwrap();
        let out = list_shapes(&registry);
        assert_eq!(out.lines().count(), 11);
        assert!(out.contains("Corporate Contact"));
        assert!(out.ends_with("Total: 10 shapes\n"));
    }

    #[test]
    fn describe_marks_required_and_nests_objects() {
        let shape = EntityShape::new("Article", "1.0.0")
            .require("headline")
            .require("author")
            .field("headline", FieldType::Text)
            .field(
                "publisher",
                FieldType::Object(Box::new(
                    EntityShape::new("Organization", "1.0.0").field("url", FieldType::Url),
                )),
            );
        assert_eq!(
            describe_shape(&shape),
            "Article 1.0.0\n  headline: string (required)\n  publisher: object (Organization)\n    url: URL\n  author: any value (required)\n"
        );
    }
}
