//! Schema module: the static per-record-type filter specification.
//!
//! A FilterSpec is built once at configuration time (typically from data a
//! build-time schema tool emitted) and shared read-only across compile calls.

use crate::classify::FieldClassifier;
use crate::types::{ColumnKind, TypeTag};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A foreign-key column's target record type and lookup column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub target: String,
    pub column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct FilterSpec {
    target: String,
    fields: HashMap<String, TypeTag>,
    field_names: Vec<String>, // index = FieldId
    field_ids: HashMap<String, usize>, // name -> id
    foreign_keys: HashMap<String, ForeignKeyRef>,
}

impl FilterSpec {
    /// The record type this spec filters, used for diagnostics.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn type_tag(&self, name: &str) -> Option<TypeTag> {
        self.fields.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn fields(&self) -> &HashMap<String, TypeTag> {
        &self.fields
    }

    /// Field names in deterministic (sorted) order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Get the field ID for a given field name, if it exists.
    pub fn field_id(&self, name: &str) -> Option<usize> {
        self.field_ids.get(name).copied()
    }

    /// Get the field name for a given field ID, if it exists.
    pub fn field_name(&self, id: usize) -> Option<&str> {
        self.field_names.get(id).map(|s| s.as_str())
    }

    /// Get the total number of fields.
    pub fn num_fields(&self) -> usize {
        self.field_names.len()
    }

    pub fn foreign_key(&self, name: &str) -> Option<&ForeignKeyRef> {
        self.foreign_keys.get(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum ColumnDecl {
    Tag(TypeTag),
    Kind(ColumnKind),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterSpecBuilder {
    target: String,
    classifier: FieldClassifier,
    columns: HashMap<String, ColumnDecl>,
    foreign_keys: HashMap<String, ForeignKeyRef>,
}

impl FilterSpecBuilder {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            classifier: FieldClassifier::new(),
            columns: HashMap::new(),
            foreign_keys: HashMap::new(),
        }
    }

    pub fn classifier(mut self, classifier: FieldClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Declares a field with an explicit type tag, bypassing classification.
    pub fn field(mut self, name: impl Into<String>, tag: TypeTag) -> Self {
        self.columns.insert(name.into(), ColumnDecl::Tag(tag));
        self
    }

    /// Declares a field by its schema column family; the classifier assigns
    /// the tag at build time.
    pub fn column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.insert(name.into(), ColumnDecl::Kind(kind));
        self
    }

    /// Declares a foreign-key field pointing at another record type.
    pub fn foreign_key(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.columns
            .insert(name.clone(), ColumnDecl::Tag(TypeTag::ForeignKey));
        self.foreign_keys.insert(
            name,
            ForeignKeyRef {
                target: target.into(),
                column: column.into(),
            },
        );
        self
    }

    pub fn build(self) -> FilterSpec {
        let mut fields = HashMap::new();
        for (name, decl) in &self.columns {
            let tag = match decl {
                ColumnDecl::Tag(tag) => *tag,
                ColumnDecl::Kind(kind) => {
                    self.classifier
                        .classify(name, *kind, self.foreign_keys.contains_key(name))
                }
            };
            fields.insert(name.clone(), tag);
        }
        let mut field_names: Vec<_> = fields.keys().cloned().collect();
        field_names.sort();
        let mut field_ids = HashMap::new();
        for (id, name) in field_names.iter().enumerate() {
            field_ids.insert(name.clone(), id);
        }
        FilterSpec {
            target: self.target,
            fields,
            field_names,
            field_ids,
            foreign_keys: self.foreign_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> FilterSpec {
        FilterSpecBuilder::new("Article")
            .column("title", ColumnKind::Varchar)
            .column("views", ColumnKind::Integer)
            .column("is_published", ColumnKind::TinyInt)
            .column("created_at", ColumnKind::Timestamp)
            .foreign_key("author_id", "Author", "id")
            .build()
    }

    #[test]
    fn test_field_registration_and_classification() {
        let spec = spec();
        assert_eq!(spec.type_tag("title"), Some(TypeTag::Text));
        assert_eq!(spec.type_tag("views"), Some(TypeTag::Number));
        assert_eq!(spec.type_tag("is_published"), Some(TypeTag::Boolean));
        assert_eq!(spec.type_tag("created_at"), Some(TypeTag::Date));
        assert_eq!(spec.type_tag("author_id"), Some(TypeTag::ForeignKey));
        assert_eq!(spec.type_tag("missing"), None);
    }

    #[test]
    fn test_foreign_key_lookup() {
        let spec = spec();
        let fk = spec.foreign_key("author_id").unwrap();
        assert_eq!(fk.target, "Author");
        assert_eq!(fk.column, "id");
        assert!(spec.foreign_key("title").is_none());
    }

    #[test]
    fn test_field_order_is_sorted_and_stable() {
        let spec = spec();
        let mut sorted = spec.field_names().to_vec();
        sorted.sort();
        assert_eq!(spec.field_names(), sorted.as_slice());
        assert_eq!(spec.num_fields(), 5);
        let id = spec.field_id("title").unwrap();
        assert_eq!(spec.field_name(id), Some("title"));
    }

    #[test]
    fn test_explicit_tag_wins_over_declaration_order() {
        let spec = FilterSpecBuilder::new("T")
            .field("code", TypeTag::Text)
            .build();
        assert_eq!(spec.type_tag("code"), Some(TypeTag::Text));
    }

    #[test]
    fn test_spec_serialization_deserialization() {
        let spec = spec();
        let json = serde_json::to_string(&spec).unwrap();
        let deser: FilterSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec.fields(), deser.fields());
        assert_eq!(spec.target(), deser.target());
    }
}
