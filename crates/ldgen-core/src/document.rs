//! # Composer — Top-Level JSON-LD Documents
//!
//! An [`LdDocument`] is one embeddable unit: exactly one `@context` plus a
//! root entity, serialized as `{"@context": ..., "@type": ..., ...}`.
//!
//! A page that emits several structured-data blocks holds them in a
//! [`Page`]. Unrelated top-level entities are never merged into one
//! document, and the page preserves caller order: consumers index blocks
//! by position.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::entity::LdEntity;

/// Context used when the caller does not name one.
pub const DEFAULT_CONTEXT: &str = "http://schema.org";

/// Spellings of the schema.org context URI seen in published documents.
/// All are accepted; none is treated as canonical.
pub const SCHEMA_ORG_CONTEXTS: [&str; 4] = [
    "http://schema.org",
    "https://schema.org",
    "http://schema.org/",
    "https://schema.org/",
];

/// One top-level JSON-LD document.
#[derive(Debug, Clone, PartialEq)]
pub struct LdDocument {
    context: String,
    root: LdEntity,
}

impl LdDocument {
    /// The `@context` value.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// The root entity.
    pub fn root(&self) -> &LdEntity {
        &self.root
    }

    /// Convert to a `serde_json::Value` tree (`@context`, `@type`, fields).
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::with_capacity(self.root.fields().len() + 2);
        map.insert("@context".to_string(), serde_json::Value::from(self.context.as_str()));
        if let serde_json::Value::Object(root) = self.root.to_json() {
            map.extend(root);
        }
        serde_json::Value::Object(map)
    }
}

impl Serialize for LdDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.root.fields().len() + 2))?;
        map.serialize_entry("@context", &self.context)?;
        self.root.serialize_entries(&mut map)?;
        map.end()
    }
}

/// Wrap `root` in a document with the given `@context`. The root is nested
/// unchanged.
pub fn compose(context: impl Into<String>, root: LdEntity) -> LdDocument {
    LdDocument {
        context: context.into(),
        root,
    }
}

/// [`compose`] with [`DEFAULT_CONTEXT`].
pub fn compose_default(root: LdEntity) -> LdDocument {
    compose(DEFAULT_CONTEXT, root)
}

/// Ordered sequence of independent documents emitted by one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    documents: Vec<LdDocument>,
}

impl Page {
    /// An empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose one document per root entity, all sharing `context`, in the
    /// order given.
    pub fn compose_all<I>(context: &str, roots: I) -> Self
    where
        I: IntoIterator<Item = LdEntity>,
    {
        Self {
            documents: roots.into_iter().map(|root| compose(context, root)).collect(),
        }
    }

    /// Append a document and return its index.
    pub fn push(&mut self, document: LdDocument) -> usize {
        self.documents.push(document);
        self.documents.len() - 1
    }

    /// Document at `index`, in push order.
    pub fn get(&self, index: usize) -> Option<&LdDocument> {
        self.documents.get(index)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the page emits nothing.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in order.
    pub fn iter(&self) -> std::slice::Iter<'_, LdDocument> {
        self.documents.iter()
    }

    /// Consume into the ordered documents.
    pub fn into_documents(self) -> Vec<LdDocument> {
        self.documents
    }
}

impl FromIterator<LdDocument> for Page {
    fn from_iter<I: IntoIterator<Item = LdDocument>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Page {
    type Item = &'a LdDocument;
    type IntoIter = std::slice::Iter<'a, LdDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SchemaType;
    use serde_json::json;

    fn thing(name: &str) -> LdEntity {
        SchemaType::Thing.builder().set("name", name).build().unwrap()
    }

    #[test]
    fn compose_default_uses_http_schema_org() {
        let doc = compose_default(thing("ACME"));
        assert_eq!(doc.context(), "http://schema.org");
        assert_eq!(
            doc.to_json(),
            json!({"@context": "http://schema.org", "@type": "Thing", "name": "ACME"})
        );
    }

    #[test]
    fn compose_keeps_given_context_verbatim() {
        let doc = compose("http://schema.org/", thing("ACME"));
        assert_eq!(doc.context(), "http://schema.org/");
    }

    #[test]
    fn serialized_document_leads_with_context_then_type() {
        let doc = compose("https://schema.org", thing("ACME"));
        let s = serde_json::to_string(&doc).unwrap();
        assert_eq!(s, r#"{"@context":"https://schema.org","@type":"Thing","name":"ACME"}"#);
    }

    #[test]
    fn page_preserves_push_order() {
        let mut page = Page::new();
        assert_eq!(page.push(compose_default(thing("zero"))), 0);
        assert_eq!(page.push(compose_default(thing("one"))), 1);
        assert_eq!(page.push(compose_default(thing("two"))), 2);
        let names: Vec<String> = page
            .iter()
            .map(|d| d.root().get("name").and_then(|v| v.as_str()).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["zero", "one", "two"]);
        assert!(page.get(3).is_none());
    }

    #[test]
    fn compose_all_emits_one_document_per_root() {
        let page = Page::compose_all(DEFAULT_CONTEXT, vec![thing("a"), thing("b")]);
        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|d| d.context() == DEFAULT_CONTEXT));
    }
}
