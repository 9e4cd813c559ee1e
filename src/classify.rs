//! Classification module: maps a field name plus its declared column family
//! to a semantic type tag.

use crate::types::{ColumnKind, TypeTag};
use serde::{Deserialize, Serialize};

/// Ordered classification rules, first match wins:
///
/// 1. a known foreign-key column is `ForeignKey`;
/// 2. a boolean-like name (default: case-insensitive `is_` prefix) is
///    `Boolean`, overriding the declared column family;
/// 3. otherwise the column family decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldClassifier {
    boolean_marker: String,
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self {
            boolean_marker: "is_".to_string(),
        }
    }
}

impl FieldClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the name prefix that forces a `Boolean` classification.
    pub fn with_boolean_marker(marker: impl Into<String>) -> Self {
        Self {
            boolean_marker: marker.into(),
        }
    }

    pub fn looks_boolean(&self, field: &str) -> bool {
        field
            .get(..self.boolean_marker.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(&self.boolean_marker))
    }

    pub fn classify(&self, field: &str, kind: ColumnKind, foreign_key: bool) -> TypeTag {
        if foreign_key {
            return TypeTag::ForeignKey;
        }
        if self.looks_boolean(field) {
            return TypeTag::Boolean;
        }
        kind.family_tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_key_wins_over_everything() {
        let c = FieldClassifier::new();
        assert_eq!(c.classify("is_admin", ColumnKind::Boolean, true), TypeTag::ForeignKey);
        assert_eq!(c.classify("author_id", ColumnKind::Integer, true), TypeTag::ForeignKey);
    }

    #[test]
    fn test_boolean_marker_overrides_column_family() {
        let c = FieldClassifier::new();
        assert_eq!(c.classify("is_deleted", ColumnKind::Integer, false), TypeTag::Boolean);
        assert_eq!(c.classify("IS_ACTIVE", ColumnKind::Varchar, false), TypeTag::Boolean);
        // Prefix match is on the full marker, underscore included.
        assert_eq!(c.classify("island", ColumnKind::Varchar, false), TypeTag::Text);
    }

    #[test]
    fn test_column_family_fallback() {
        let c = FieldClassifier::new();
        assert_eq!(c.classify("age", ColumnKind::Integer, false), TypeTag::Number);
        assert_eq!(c.classify("created_at", ColumnKind::Timestamp, false), TypeTag::Date);
        assert_eq!(c.classify("name", ColumnKind::Varchar, false), TypeTag::Text);
        assert_eq!(c.classify("active", ColumnKind::Boolean, false), TypeTag::Boolean);
    }

    #[test]
    fn test_custom_marker() {
        let c = FieldClassifier::with_boolean_marker("has_");
        assert_eq!(c.classify("has_children", ColumnKind::Integer, false), TypeTag::Boolean);
        assert_eq!(c.classify("is_deleted", ColumnKind::Integer, false), TypeTag::Number);
    }
}
