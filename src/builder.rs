//! Builder module: per-type predicate construction strategies.
//!
//! Dispatch is an explicit table from type tag to strategy object, resolved at
//! configuration time. Hosts may override any per-type rule or register a
//! per-field rule as an escape hatch for bespoke columns.

use crate::predicate::Predicate;
use crate::types::{FilterValue, TypeTag};
use crate::CriterustError;
use std::collections::HashMap;
use std::sync::Arc;

/// A strategy that turns one field's value into a predicate. `Ok(None)` means
/// "no predicate for this field", the designed no-op for blank values.
pub trait PredicateRule: Send + Sync {
    fn build(&self, field: &str, value: &FilterValue)
        -> Result<Option<Predicate>, CriterustError>;
}

impl<F> PredicateRule for F
where
    F: Fn(&str, &FilterValue) -> Result<Option<Predicate>, CriterustError> + Send + Sync,
{
    fn build(
        &self,
        field: &str,
        value: &FilterValue,
    ) -> Result<Option<Predicate>, CriterustError> {
        self(field, value)
    }
}

/// Matches rows where the field is the empty string or NULL. A plain IS_NULL
/// would miss stores that keep empty strings for blank columns.
fn blank_or_null(field: &str) -> Predicate {
    Predicate::eq(field, FilterValue::text("")).or(Predicate::is_null(field))
}

/// `*` becomes `%`, and a trailing `%` is always appended, so `"foo*bar"`
/// searches as `"foo%bar%"`.
fn like_pattern(text: &str) -> String {
    let mut pattern = text.replace('*', "%");
    pattern.push('%');
    pattern
}

/// Text fields: partial match via LIKE, with the empty-match marker matching
/// both empty-string and NULL rows.
pub struct TextRule;

impl PredicateRule for TextRule {
    fn build(
        &self,
        field: &str,
        value: &FilterValue,
    ) -> Result<Option<Predicate>, CriterustError> {
        match value {
            FilterValue::Empty => Ok(Some(blank_or_null(field))),
            FilterValue::Match { text } if !text.is_empty() => {
                Ok(Some(Predicate::like(field, like_pattern(text))))
            }
            FilterValue::Match { .. } => Ok(None),
            v if v.is_blank() => Ok(None),
            v => match v.scalar_text() {
                Some(text) => Ok(Some(Predicate::like(field, like_pattern(&text)))),
                None => Err(CriterustError::malformed(
                    field,
                    "text fields take a scalar, a {text} record, or the empty-match marker",
                )),
            },
        }
    }
}

/// Number fields: exact comparison. A `{text}` record compares its text
/// verbatim, with no wildcard substitution.
pub struct NumberRule;

impl PredicateRule for NumberRule {
    fn build(
        &self,
        field: &str,
        value: &FilterValue,
    ) -> Result<Option<Predicate>, CriterustError> {
        match value {
            FilterValue::Empty => Ok(Some(blank_or_null(field))),
            FilterValue::Match { text } if !text.is_empty() => {
                Ok(Some(Predicate::eq(field, FilterValue::text(text))))
            }
            FilterValue::Match { .. } => Ok(None),
            v if v.is_blank() => Ok(None),
            v if v.is_scalar() => Ok(Some(Predicate::eq(field, v.clone()))),
            _ => Err(CriterustError::malformed(
                field,
                "number fields take a scalar, a {text} record, or the empty-match marker",
            )),
        }
    }
}

/// Boolean fields: always an exact comparison, no empty/null special case.
pub struct BooleanRule;

impl PredicateRule for BooleanRule {
    fn build(
        &self,
        field: &str,
        value: &FilterValue,
    ) -> Result<Option<Predicate>, CriterustError> {
        Ok(Some(Predicate::eq(field, value.clone())))
    }
}

/// Date fields: a `{from, to}` record becomes a GE/LE range; the empty-match
/// marker becomes plain IS_NULL.
pub struct DateRule;

impl PredicateRule for DateRule {
    fn build(
        &self,
        field: &str,
        value: &FilterValue,
    ) -> Result<Option<Predicate>, CriterustError> {
        match value {
            FilterValue::Empty => Ok(Some(Predicate::is_null(field))),
            FilterValue::Range { from, to } => {
                let from = from.as_deref().filter(|s| !s.is_empty());
                let to = to.as_deref().filter(|s| !s.is_empty());
                Ok(match (from, to) {
                    (Some(from), Some(to)) => Some(
                        Predicate::ge(field, FilterValue::text(from))
                            .and(Predicate::le(field, FilterValue::text(to))),
                    ),
                    (Some(from), None) => Some(Predicate::ge(field, FilterValue::text(from))),
                    (None, Some(to)) => Some(Predicate::le(field, FilterValue::text(to))),
                    (None, None) => None,
                })
            }
            v if v.is_blank() => Ok(None),
            _ => Err(CriterustError::malformed(
                field,
                "date fields take a {from, to} record or the empty-match marker",
            )),
        }
    }
}

/// Foreign-key fields: exact match against one candidate, an OR-chain over a
/// candidate list, or the blank-or-null form for the empty-match marker.
#[derive(Default)]
pub struct ForeignKeyRule {
    /// Legacy quirk: pair `EQ ""` with the candidate id, so blank rows match
    /// alongside the selected one. Off unless explicitly opted in.
    pub pair_blank_with_id: bool,
}

impl PredicateRule for ForeignKeyRule {
    fn build(
        &self,
        field: &str,
        value: &FilterValue,
    ) -> Result<Option<Predicate>, CriterustError> {
        match value {
            FilterValue::Empty => Ok(Some(blank_or_null(field))),
            FilterValue::Ref { id } => {
                // A zero or empty id means "nothing selected".
                let id = id.as_deref().filter(|s| !s.is_empty() && *s != "0");
                Ok(id.map(|id| {
                    let selected = Predicate::eq(field, FilterValue::text(id));
                    if self.pair_blank_with_id {
                        Predicate::eq(field, FilterValue::text("")).or(selected)
                    } else {
                        selected
                    }
                }))
            }
            FilterValue::List(candidates) => {
                let mut candidates = candidates.clone();
                // The last candidate seeds the OR-chain; OR is commutative so
                // the order is an artifact, not a semantic.
                Ok(candidates.pop().map(|seed| {
                    candidates
                        .into_iter()
                        .fold(Predicate::eq(field, seed), |chain, candidate| {
                            chain.or(Predicate::eq(field, candidate))
                        })
                }))
            }
            v if v.is_blank() => Ok(None),
            v if v.is_scalar() => Ok(Some(Predicate::eq(field, v.clone()))),
            _ => Err(CriterustError::malformed(
                field,
                "foreign-key fields take a scalar, a list, an {id} record, or the empty-match marker",
            )),
        }
    }
}

/// The configuration-time dispatch table from type tag to strategy.
#[derive(Clone)]
pub struct TypeBuilders {
    rules: HashMap<TypeTag, Arc<dyn PredicateRule>>,
}

impl Default for TypeBuilders {
    fn default() -> Self {
        let mut rules: HashMap<TypeTag, Arc<dyn PredicateRule>> = HashMap::new();
        rules.insert(TypeTag::Text, Arc::new(TextRule));
        rules.insert(TypeTag::Number, Arc::new(NumberRule));
        rules.insert(TypeTag::Boolean, Arc::new(BooleanRule));
        rules.insert(TypeTag::Date, Arc::new(DateRule));
        rules.insert(TypeTag::ForeignKey, Arc::new(ForeignKeyRule::default()));
        Self { rules }
    }
}

impl TypeBuilders {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default table with the legacy blank-pairing foreign-key rule.
    pub fn with_legacy_foreign_key_pairing() -> Self {
        let mut builders = Self::default();
        builders.set(
            TypeTag::ForeignKey,
            ForeignKeyRule {
                pair_blank_with_id: true,
            },
        );
        builders
    }

    pub fn set<R>(&mut self, tag: TypeTag, rule: R)
    where
        R: PredicateRule + 'static,
    {
        self.rules.insert(tag, Arc::new(rule));
    }

    pub fn get(&self, tag: TypeTag) -> Option<&Arc<dyn PredicateRule>> {
        self.rules.get(&tag)
    }
}

/// Per-field custom rules, tried before any per-type strategy.
#[derive(Clone, Default)]
pub struct FieldRules {
    rules: HashMap<String, Arc<dyn PredicateRule>>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<R>(&mut self, field: impl Into<String>, rule: R)
    where
        R: PredicateRule + 'static,
    {
        self.rules.insert(field.into(), Arc::new(rule));
    }

    pub fn get(&self, field: &str) -> Option<&Arc<dyn PredicateRule>> {
        self.rules.get(field)
    }
}
