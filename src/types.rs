//! Types module: semantic type tags, column families, and input value shapes.
//!
//! This module provides the TypeTag, ColumnKind, and FilterValue enums.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic classification of a filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TypeTag {
    Text,
    Number,
    Boolean,
    Date,
    ForeignKey,
    /// The field is not part of the spec; it is only resolvable through a
    /// custom rule or an embedded/merged sub-filter.
    None,
}

/// Declared column type families, as a schema description would report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ColumnKind {
    Boolean,
    Date,
    Time,
    Timestamp,
    Integer,
    SmallInt,
    TinyInt,
    BigInt,
    Float,
    Double,
    Decimal,
    Numeric,
    Real,
    Char,
    Varchar,
    LongVarchar,
    Enum,
    Blob,
}

impl ColumnKind {
    /// The type tag this column family maps to, before any naming-convention
    /// override is applied.
    pub fn family_tag(&self) -> TypeTag {
        match self {
            ColumnKind::Boolean => TypeTag::Boolean,
            ColumnKind::Date | ColumnKind::Time | ColumnKind::Timestamp => TypeTag::Date,
            ColumnKind::Integer
            | ColumnKind::SmallInt
            | ColumnKind::TinyInt
            | ColumnKind::BigInt
            | ColumnKind::Float
            | ColumnKind::Double
            | ColumnKind::Decimal
            | ColumnKind::Numeric
            | ColumnKind::Real => TypeTag::Number,
            _ => TypeTag::Text,
        }
    }
}

/// A single value from the input boundary: a scalar, a list, a nested value
/// map (for embedded sub-filters), or one of the structured option records the
/// surrounding form layer produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FilterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<FilterValue>),
    Map(BTreeMap<String, FilterValue>),
    /// Empty-match marker: explicitly requests "blank or absent" semantics,
    /// distinct from simply omitting the field.
    Empty,
    /// Partial-match record, e.g. `{text: "foo*"}`.
    Match { text: String },
    /// Range record, e.g. `{from: "2020-01-01", to: "2020-12-31"}`.
    Range {
        from: Option<String>,
        to: Option<String>,
    },
    /// Single-candidate lookup record, e.g. `{id: "7"}`.
    Ref { id: Option<String> },
}

/// The field-to-value mapping handed to a compile call. A BTreeMap keeps
/// iteration order deterministic across runs.
pub type FilterValues = BTreeMap<String, FilterValue>;

impl FilterValue {
    pub fn text(s: impl Into<String>) -> Self {
        FilterValue::Text(s.into())
    }

    pub fn matches(text: impl Into<String>) -> Self {
        FilterValue::Match { text: text.into() }
    }

    pub fn range(from: Option<&str>, to: Option<&str>) -> Self {
        FilterValue::Range {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    pub fn reference(id: impl Into<String>) -> Self {
        FilterValue::Ref {
            id: Some(id.into()),
        }
    }

    /// Null and the empty string are treated identically to "field absent".
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Null => true,
            FilterValue::Text(t) => t.is_empty(),
            _ => false,
        }
    }

    /// Renders a plain scalar as text, for builders that compare against the
    /// printed form. Structured records and collections have no scalar text.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            FilterValue::Text(t) => Some(t.clone()),
            FilterValue::Int(i) => Some(i.to_string()),
            FilterValue::Float(f) => Some(f.to_string()),
            FilterValue::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            FilterValue::Bool(_) | FilterValue::Int(_) | FilterValue::Float(_) | FilterValue::Text(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_family_tags() {
        assert_eq!(ColumnKind::Boolean.family_tag(), TypeTag::Boolean);
        assert_eq!(ColumnKind::Timestamp.family_tag(), TypeTag::Date);
        assert_eq!(ColumnKind::Decimal.family_tag(), TypeTag::Number);
        assert_eq!(ColumnKind::BigInt.family_tag(), TypeTag::Number);
        assert_eq!(ColumnKind::Varchar.family_tag(), TypeTag::Text);
        assert_eq!(ColumnKind::Blob.family_tag(), TypeTag::Text);
    }

    #[test]
    fn test_blankness() {
        assert!(FilterValue::Null.is_blank());
        assert!(FilterValue::text("").is_blank());
        assert!(!FilterValue::text("x").is_blank());
        assert!(!FilterValue::Int(0).is_blank());
        // The empty-match marker is an explicit request, not a blank.
        assert!(!FilterValue::Empty.is_blank());
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(FilterValue::Int(42).scalar_text(), Some("42".to_string()));
        assert_eq!(FilterValue::Bool(true).scalar_text(), Some("1".to_string()));
        assert_eq!(FilterValue::text("abc").scalar_text(), Some("abc".to_string()));
        assert_eq!(FilterValue::Empty.scalar_text(), None);
        assert_eq!(FilterValue::List(vec![]).scalar_text(), None);
    }

    #[test]
    fn test_serialization_deserialization() {
        let val = FilterValue::List(vec![
            FilterValue::Int(1),
            FilterValue::text("foo"),
            FilterValue::range(Some("2020-01-01"), None),
        ]);
        let json = serde_json::to_string(&val).unwrap();
        let deser: FilterValue = serde_json::from_str(&json).unwrap();
        assert_eq!(val, deser);
    }
}
