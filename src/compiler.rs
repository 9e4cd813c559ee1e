//! Compiler module: orchestrates preprocessing, classification, and predicate
//! construction into the public compile entry point.

use crate::builder::{FieldRules, PredicateRule, TypeBuilders};
use crate::convert::ConvertRegistry;
use crate::predicate::Predicate;
use crate::schema::FilterSpec;
use crate::types::{FilterValue, FilterValues, TypeTag};
use crate::CriterustError;
use std::collections::HashMap;
use std::sync::Arc;

/// Compiles submitted filter values into a predicate tree.
///
/// A compiler is configured once (spec, hooks, rules, sub-filters) and then
/// shared read-only; every `compile` call is an independent, pure transform.
/// Sub-filters are registered bottom-up, so the delegation graph is acyclic by
/// construction.
pub struct FilterCompiler {
    spec: Arc<FilterSpec>,
    hooks: ConvertRegistry,
    type_builders: TypeBuilders,
    field_rules: FieldRules,
    embedded: HashMap<String, Arc<FilterCompiler>>,
    merged: Vec<Arc<FilterCompiler>>,
}

impl FilterCompiler {
    pub fn new(spec: Arc<FilterSpec>) -> Self {
        Self {
            spec,
            hooks: ConvertRegistry::new(),
            type_builders: TypeBuilders::new(),
            field_rules: FieldRules::new(),
            embedded: HashMap::new(),
            merged: Vec::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: ConvertRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_type_builders(mut self, builders: TypeBuilders) -> Self {
        self.type_builders = builders;
        self
    }

    /// Registers a custom rule for one field, tried before the per-type
    /// strategies.
    pub fn with_field_rule<R>(mut self, field: impl Into<String>, rule: R) -> Self
    where
        R: PredicateRule + 'static,
    {
        self.field_rules.register(field, rule);
        self
    }

    /// Registers an embedded sub-filter: the single owner of one field, which
    /// receives that field's nested value map.
    pub fn embed(mut self, field: impl Into<String>, sub: Arc<FilterCompiler>) -> Self {
        self.embedded.insert(field.into(), sub);
        self
    }

    /// Registers a merged sibling filter. Every merged filter whose spec
    /// declares a field contributes its predicate; claims are not exclusive.
    pub fn merge(mut self, sub: Arc<FilterCompiler>) -> Self {
        self.merged.push(sub);
        self
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn merged(&self) -> &[Arc<FilterCompiler>] {
        &self.merged
    }

    /// Compiles raw submitted values into a predicate tree. Conversion hooks
    /// run exactly once, before any predicate is built. The host is expected
    /// to have validated the values already; only structural mismatches fail.
    pub fn compile(&self, values: FilterValues) -> Result<Predicate, CriterustError> {
        let values = self.hooks.preprocess(values)?;
        self.compile_processed(&values)
    }

    /// Compiles values that already went through this compiler's conversion
    /// hooks. Compose on top of this instead of `compile` to avoid invoking
    /// non-idempotent hooks a second time.
    pub fn compile_processed(&self, values: &FilterValues) -> Result<Predicate, CriterustError> {
        let mut tree = Predicate::True;
        for field in self.field_order(values) {
            let value = match values.get(field) {
                Some(value) if !value.is_blank() => value,
                _ => continue,
            };
            let tag = self.spec.type_tag(field).unwrap_or(TypeTag::None);

            if let Some(rule) = self.field_rules.get(field) {
                if let Some(p) = rule.build(field, value)? {
                    tree = tree.and(p);
                }
                continue;
            }

            if tag != TypeTag::None {
                if let Some(builder) = self.type_builders.get(tag) {
                    if let Some(p) = builder.build(field, value)? {
                        tree = tree.and(p);
                    }
                    continue;
                }
            }

            tree = tree.and(self.delegate(field, value)?);
        }
        Ok(tree)
    }

    /// Offers an unclassified field to the embedded sub-filter addressed by
    /// its name, or to every merged sibling that declares it.
    fn delegate(&self, field: &str, value: &FilterValue) -> Result<Predicate, CriterustError> {
        if let Some(sub) = self.embedded.get(field) {
            let nested = match value {
                FilterValue::Map(map) => map.clone(),
                _ => {
                    return Err(CriterustError::malformed(
                        field,
                        "embedded filters take a nested value map",
                    ))
                }
            };
            // The sub-filter runs its own hooks on its own value subset.
            return sub.compile(nested);
        }

        let mut tree = Predicate::True;
        let mut claimed = false;
        for sub in &self.merged {
            if sub.spec().contains(field) {
                let mut single = FilterValues::new();
                single.insert(field.to_string(), value.clone());
                tree = tree.and(sub.compile(single)?);
                claimed = true;
            }
        }
        if claimed {
            Ok(tree)
        } else {
            Err(CriterustError::UnresolvedField {
                field: field.to_string(),
                target: self.spec.target().to_string(),
            })
        }
    }

    /// Spec fields in declared order, then submitted-only fields in sorted
    /// order. Deterministic, so repeated compiles build identical trees.
    fn field_order<'a>(&'a self, values: &'a FilterValues) -> Vec<&'a str> {
        let mut order: Vec<&str> = self
            .spec
            .field_names()
            .iter()
            .map(String::as_str)
            .collect();
        order.extend(
            values
                .keys()
                .map(String::as_str)
                .filter(|name| !self.spec.contains(name)),
        );
        order
    }
}
