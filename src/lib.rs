//! Criterust: a declarative filter-to-predicate compiler for structured data.
//!
//! Given a partial record of user-submitted filter values and a per-field type
//! classification, this crate deterministically builds an immutable predicate
//! tree that a query executor can translate into a filtered query.
//!
//! # Architecture
//! - Filter specification (fields, type tags, foreign keys)
//! - Field classification (naming conventions + schema column families)
//! - Value conversion hooks (host-registered, applied once per compile)
//! - Per-type predicate construction strategies
//! - The compile orchestrator (embedded and merged sub-filters included)
//!
//! Everything is a pure, synchronous value transform: no I/O, no shared
//! mutable state. Specs, hook registries, and sub-filter graphs are built once
//! at configuration time and shared read-only across compile calls.

mod builder;
mod classify;
mod compiler;
mod convert;
mod predicate;
mod schema;
mod types;

pub use builder::*;
pub use classify::*;
pub use compiler::*;
pub use convert::*;
pub use predicate::*;
pub use schema::*;
pub use types::*;

use thiserror::Error;

/// Unified error type for criterust operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CriterustError {
    /// A submitted field has no classification, no custom rule, and no
    /// embedded or merged sub-filter claiming it.
    #[error("no filter rule resolves field \"{field}\" on \"{target}\"")]
    UnresolvedField { field: String, target: String },

    /// A structured value does not fit the shape the field's builder expects.
    #[error("malformed value for field \"{field}\": {detail}")]
    MalformedValue { field: String, detail: String },

    /// A conversion hook failed. Hook errors propagate unchanged; the
    /// compiler performs no retry and no partial-result suppression.
    #[error("conversion hook failed for field \"{field}\": {message}")]
    Hook { field: String, message: String },
}

impl CriterustError {
    pub(crate) fn malformed(field: &str, detail: impl Into<String>) -> Self {
        CriterustError::MalformedValue {
            field: field.to_string(),
            detail: detail.into(),
        }
    }
}
