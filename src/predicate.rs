//! Predicate module: the immutable comparison/combination tree the compiler
//! produces and a query executor consumes.

use crate::types::FilterValue;
use serde::{Deserialize, Serialize};

/// Comparison operators with conventional relational semantics. `Like`
/// patterns use `%` as the wildcard character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CompareOp {
    Eq,
    Like,
    Ge,
    Le,
    IsNull,
}

/// An immutable predicate tree node. Trees are built once per compile call and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Predicate {
    /// The always-true predicate: the identity of `and`, and the result of
    /// compiling an empty value map.
    True,
    Compare {
        field: String,
        op: CompareOp,
        value: FilterValue,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: FilterValue) -> Self {
        Predicate::Compare {
            field: field.into(),
            op,
            value,
        }
    }

    pub fn eq(field: impl Into<String>, value: FilterValue) -> Self {
        Predicate::compare(field, CompareOp::Eq, value)
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Predicate::compare(field, CompareOp::Like, FilterValue::Text(pattern.into()))
    }

    pub fn ge(field: impl Into<String>, value: FilterValue) -> Self {
        Predicate::compare(field, CompareOp::Ge, value)
    }

    pub fn le(field: impl Into<String>, value: FilterValue) -> Self {
        Predicate::compare(field, CompareOp::Le, value)
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Predicate::compare(field, CompareOp::IsNull, FilterValue::Null)
    }

    /// Combines two predicates with AND. `True` is absorbed so that folding a
    /// single predicate into an empty accumulator yields that predicate bare.
    pub fn and(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (l, r) => Predicate::And(Box::new(l), Box::new(r)),
        }
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// Left-associative AND fold over any number of predicates. An empty
    /// iterator yields `True`.
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        predicates
            .into_iter()
            .fold(Predicate::True, Predicate::and)
    }

    /// Whether any comparison in this tree mentions the given field.
    pub fn references(&self, field: &str) -> bool {
        match self {
            Predicate::True => false,
            Predicate::Compare { field: f, .. } => f == field,
            Predicate::And(l, r) | Predicate::Or(l, r) => {
                l.references(field) || r.references(field)
            }
        }
    }
}
