//! # Serializer — Script-Safe JSON-LD Text
//!
//! [`ScriptSafeJson`] is the only text type produced for embedding. Its
//! inner string is private and its only constructors are [`serialize()`]
//! and [`serialize_pretty()`], so any text handed to [`script_tag()`] has
//! been through the escaping formatter.
//!
//! ## Escaping
//!
//! Inside JSON strings (values and keys) the formatter writes `<`, `>` and
//! `&` as `\u003c`, `\u003e`, `\u0026`, and the JavaScript line terminators
//! U+2028 / U+2029 as `\u2028` / `\u2029`. The sequence `</script` can
//! therefore never appear in the output, and the text still parses back to
//! the same JSON value.
//!
//! ## Determinism
//!
//! Output follows insertion order (`@context`, `@type`, then fields as the
//! builder assembled them). Equal documents always produce byte-identical
//! text.

use std::fmt;
use std::io;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};

use crate::document::{LdDocument, Page};
use crate::error::SerializeError;

/// JSON-LD text that is safe to place inside a `<script>` element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptSafeJson(String);

impl ScriptSafeJson {
    /// The JSON text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the JSON text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for ScriptSafeJson {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScriptSafeJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize a document to compact script-safe JSON.
pub fn serialize(doc: &LdDocument) -> Result<ScriptSafeJson, SerializeError> {
    write_with(doc, CompactFormatter)
}

/// Serialize a document to indented script-safe JSON.
pub fn serialize_pretty(doc: &LdDocument) -> Result<ScriptSafeJson, SerializeError> {
    write_with(doc, PrettyFormatter::new())
}

/// Wrap serialized text in a `<script type="application/ld+json">` element.
pub fn script_tag(json: &ScriptSafeJson) -> String {
    format!(r#"<script type="application/ld+json">{}</script>"#, json.as_str())
}

impl Page {
    /// Serialize every document, in page order.
    pub fn serialize_all(&self) -> Result<Vec<ScriptSafeJson>, SerializeError> {
        self.iter().map(serialize).collect()
    }

    /// Render every document as a script element, one per line, in page
    /// order.
    pub fn render(&self) -> Result<String, SerializeError> {
        let tags = self
            .serialize_all()?
            .iter()
            .map(script_tag)
            .collect::<Vec<_>>();
        Ok(tags.join("\n"))
    }
}

fn write_with<F: Formatter>(doc: &LdDocument, inner: F) -> Result<ScriptSafeJson, SerializeError> {
    let mut out = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, ScriptSafeFormatter { inner });
    doc.serialize(&mut ser)?;
    Ok(ScriptSafeJson(String::from_utf8(out)?))
}

/// Wraps a serde_json formatter, escaping HTML-significant characters in
/// string fragments and delegating layout to `inner`.
struct ScriptSafeFormatter<F> {
    inner: F,
}

impl<F: Formatter> Formatter for ScriptSafeFormatter<F> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            let escaped = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{compose, compose_default};
    use crate::entity::SchemaType;
    use serde_json::{json, Value};

    fn organization() -> LdDocument {
        compose_default(
            SchemaType::Organization
                .builder()
                .set("url", "http://www.your-site.com")
                .set("logo", "http://www.your-site.com/images/logo.jpg")
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn logo_organization_serializes_exactly() {
        let s = serialize(&organization()).unwrap();
        assert_eq!(
            s.as_str(),
            r#"{"@context":"http://schema.org","@type":"Organization","url":"http://www.your-site.com","logo":"http://www.your-site.com/images/logo.jpg"}"#
        );
        let parsed: Value = serde_json::from_str(s.as_str()).unwrap();
        assert_eq!(
            parsed,
            json!({
                "@context": "http://schema.org",
                "@type": "Organization",
                "url": "http://www.your-site.com",
                "logo": "http://www.your-site.com/images/logo.jpg",
            })
        );
    }

    #[test]
    fn closing_script_sequence_is_escaped() {
        let doc = compose_default(
            SchemaType::Thing
                .builder()
                .set("name", "</script><script>alert(1)</script>")
                .set("description", "Fish & Chips \u{2028} done")
                .build()
                .unwrap(),
        );
        let s = serialize(&doc).unwrap();
        assert!(!s.as_str().contains("</script"));
        assert!(!s.as_str().contains('<'));
        assert!(!s.as_str().contains('&'));
        assert!(s.as_str().contains(r"\u003c/script\u003e"));
        let parsed: Value = serde_json::from_str(s.as_str()).unwrap();
        assert_eq!(parsed["name"], json!("</script><script>alert(1)</script>"));
        assert_eq!(parsed["description"], json!("Fish & Chips \u{2028} done"));
    }

    #[test]
    fn pretty_output_is_also_escaped_and_equivalent() {
        let doc = compose(
            "https://schema.org",
            SchemaType::Thing.builder().set("name", "<b>").build().unwrap(),
        );
        let pretty = serialize_pretty(&doc).unwrap();
        assert!(pretty.as_str().contains('\n'));
        assert!(!pretty.as_str().contains("<b>"));
        let compact = serialize(&doc).unwrap();
        let a: Value = serde_json::from_str(pretty.as_str()).unwrap();
        let b: Value = serde_json::from_str(compact.as_str()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn script_tag_wraps_text() {
        let s = serialize(&organization()).unwrap();
        let tag = script_tag(&s);
        assert!(tag.starts_with(r#"<script type="application/ld+json">{"@context""#));
        assert!(tag.ends_with("}</script>"));
    }

    #[test]
    fn page_render_emits_blocks_in_order() {
        let mut page = Page::new();
        page.push(organization());
        page.push(compose_default(
            SchemaType::Thing.builder().set("name", "second").build().unwrap(),
        ));
        let rendered = page.render().unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Organization"));
        assert!(lines[1].contains("second"));
    }
}
