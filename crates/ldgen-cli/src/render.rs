//! # Render Subcommand
//!
//! Builds every entity of a page config, composes each into its own
//! document and prints the result in page order.
//!
//! ```yaml
//! context: https://schema.org        # optional, page-wide
//! documents:
//!   - entity:
//!       "@type": Organization
//!       url: http://www.your-site.com
//!       logo: http://www.your-site.com/images/logo.jpg
//!   - context: http://schema.org/      # optional, per document
//!     entity:
//!       "@type": Thing
//!       name: ACME
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use ldgen_core::{compose, entity_from_json, script_tag, serialize, serialize_pretty, Page};

use crate::config::CliConfig;
use crate::read_value;

/// Arguments for `ldgen render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Page config (YAML or JSON).
    pub page: PathBuf,

    /// Print bare JSON-LD documents instead of script elements.
    #[arg(long)]
    pub json: bool,

    /// Pretty-print the JSON-LD.
    #[arg(long)]
    pub pretty: bool,
}

/// A page config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    /// Context for documents that do not name one.
    #[serde(default)]
    pub context: Option<String>,
    /// Documents in emission order.
    pub documents: Vec<DocumentConfig>,
}

/// One document of a page config.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentConfig {
    /// Overrides the page context.
    #[serde(default)]
    pub context: Option<String>,
    /// Root entity, with `@type`.
    pub entity: serde_json::Value,
}

impl PageConfig {
    /// Build and compose every document. `fallback_context` applies when
    /// neither the document nor the page names one.
    pub fn build(&self, fallback_context: &str) -> Result<Page> {
        let page_context = self.context.as_deref().unwrap_or(fallback_context);
        self.documents
            .iter()
            .enumerate()
            .map(|(index, doc)| {
                let root = entity_from_json(&doc.entity)
                    .with_context(|| format!("document {index} could not be built"))?;
                Ok(compose(doc.context.as_deref().unwrap_or(page_context), root))
            })
            .collect()
    }
}

/// Output layout for a rendered page.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderFormat {
    /// Bare JSON instead of script elements.
    pub json: bool,
    /// Indented JSON.
    pub pretty: bool,
}

/// Render every document of `page`, one block per line (or per pretty
/// block), in page order.
pub fn render_page(page: &Page, format: RenderFormat) -> Result<String> {
    let mut blocks = Vec::with_capacity(page.len());
    for (index, doc) in page.iter().enumerate() {
        let text = if format.pretty {
            serialize_pretty(doc)
        } else {
            serialize(doc)
        }
        .with_context(|| format!("document {index} could not be serialized"))?;
        blocks.push(if format.json {
            text.into_string()
        } else {
            script_tag(&text)
        });
    }
    Ok(blocks.join("\n"))
}

/// Execute `ldgen render`.
pub fn run_render(args: &RenderArgs, config: &CliConfig) -> Result<u8> {
    let value = read_value(&args.page)?;
    let page_config: PageConfig = serde_json::from_value(value)
        .with_context(|| format!("{} is not a page config", args.page.display()))?;
    let page = page_config.build(&config.default_context)?;
    tracing::info!(documents = page.len(), page = %args.page.display(), "built page");

    let format = RenderFormat {
        json: args.json,
        pretty: args.pretty || config.pretty,
    };
    println!("{}", render_page(&page, format)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_config(value: serde_json::Value) -> PageConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn contexts_resolve_document_then_page_then_fallback() {
        let with_page_context = page_config(json!({
            "context": "https://schema.org",
            "documents": [
                { "entity": { "@type": "Thing", "name": "a" } },
                { "context": "http://schema.org/", "entity": { "@type": "Thing", "name": "b" } },
            ]
        }));
        let page = with_page_context.build("http://schema.org").unwrap();
        assert_eq!(page.get(0).unwrap().context(), "https://schema.org");
        assert_eq!(page.get(1).unwrap().context(), "http://schema.org/");

        let without = page_config(json!({
            "documents": [{ "entity": { "@type": "Thing", "name": "a" } }]
        }));
        let page = without.build("http://schema.org").unwrap();
        assert_eq!(page.get(0).unwrap().context(), "http://schema.org");
    }

    #[test]
    fn build_error_names_the_document() {
        let config = page_config(json!({
            "documents": [
                { "entity": { "@type": "Thing", "name": "ok" } },
                { "entity": { "@type": "Thing", "colour": "red" } },
            ]
        }));
        let err = config.build("http://schema.org").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("document 1"), "{message}");
        assert!(message.contains("colour"), "{message}");
    }

    #[test]
    fn unknown_page_keys_are_rejected() {
        let result: Result<PageConfig, _> = serde_json::from_value(json!({
            "documents": [],
            "title": "nope",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn renders_script_elements_in_order() {
        let page = page_config(json!({
            "documents": [
                { "entity": { "@type": "Thing", "name": "first" } },
                { "entity": { "@type": "Thing", "name": "second" } },
            ]
        }))
        .build("http://schema.org")
        .unwrap();
        let out = render_page(&page, RenderFormat::default()).unwrap();
        assert_eq!(
            out,
            concat!(
                r#"<script type="application/ld+json">{"@context":"http://schema.org","@type":"Thing","name":"first"}</script>"#,
                "\n",
                r#"<script type="application/ld+json">{"@context":"http://schema.org","@type":"Thing","name":"second"}</script>"#,
            )
        );
    }

    #[test]
    fn json_format_prints_bare_documents() {
        let page = page_config(json!({
            "documents": [{ "entity": { "@type": "Thing", "name": "a<b" } }]
        }))
        .build("http://schema.org")
        .unwrap();
        let out = render_page(&page, RenderFormat { json: true, pretty: false }).unwrap();
        assert!(out.starts_with('{'));
        assert!(!out.contains('<'));
    }
}
