//! Conversion module: host-registered hooks applied to raw values before any
//! predicate is built.

use crate::types::{FilterValue, FilterValues};
use crate::CriterustError;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of a conversion hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// Replace the raw value with this one.
    Keep(FilterValue),
    /// Drop the field entirely; downstream builders never see the key.
    Omit,
}

/// A per-field conversion hook. Hooks must be pure with respect to the value
/// map; the compiler guarantees each hook runs at most once per compile call,
/// so non-idempotent hooks are safe.
pub trait ConvertHook: Send + Sync {
    fn convert(&self, value: &FilterValue) -> Result<Conversion, CriterustError>;
}

impl<F> ConvertHook for F
where
    F: Fn(&FilterValue) -> Result<Conversion, CriterustError> + Send + Sync,
{
    fn convert(&self, value: &FilterValue) -> Result<Conversion, CriterustError> {
        self(value)
    }
}

/// Field name to conversion hook mapping, registered at configuration time.
#[derive(Clone, Default)]
pub struct ConvertRegistry {
    hooks: HashMap<String, Arc<dyn ConvertHook>>,
}

impl ConvertRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, field: impl Into<String>, hook: H)
    where
        H: ConvertHook + 'static,
    {
        self.hooks.insert(field.into(), Arc::new(hook));
    }

    pub fn get(&self, field: &str) -> Option<&Arc<dyn ConvertHook>> {
        self.hooks.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Runs every registered hook against its field, once. Fields without a
    /// hook pass through unchanged; `Omit` removes the key from the output.
    /// Hook errors propagate unchanged.
    pub fn preprocess(&self, values: FilterValues) -> Result<FilterValues, CriterustError> {
        if self.hooks.is_empty() {
            return Ok(values);
        }
        let mut out = FilterValues::new();
        for (field, value) in values {
            match self.hooks.get(&field) {
                Some(hook) => match hook.convert(&value)? {
                    Conversion::Keep(converted) => {
                        out.insert(field, converted);
                    }
                    Conversion::Omit => {}
                },
                None => {
                    out.insert(field, value);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, FilterValue)]) -> FilterValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_passthrough_without_hooks() {
        let reg = ConvertRegistry::new();
        let input = values(&[("a", FilterValue::Int(1))]);
        assert_eq!(reg.preprocess(input.clone()).unwrap(), input);
    }

    #[test]
    fn test_keep_replaces_value() {
        let mut reg = ConvertRegistry::new();
        reg.register(
            "name",
            |v: &FilterValue| -> Result<Conversion, CriterustError> {
                let text = v.scalar_text().unwrap_or_default();
                Ok(Conversion::Keep(FilterValue::text(text.trim())))
            },
        );
        let out = reg
            .preprocess(values(&[("name", FilterValue::text("  jo  "))]))
            .unwrap();
        assert_eq!(out.get("name"), Some(&FilterValue::text("jo")));
    }

    #[test]
    fn test_omit_removes_key_entirely() {
        let mut reg = ConvertRegistry::new();
        reg.register(
            "secret",
            |_: &FilterValue| -> Result<Conversion, CriterustError> { Ok(Conversion::Omit) },
        );
        let out = reg
            .preprocess(values(&[
                ("secret", FilterValue::Int(1)),
                ("kept", FilterValue::Int(2)),
            ]))
            .unwrap();
        assert!(!out.contains_key("secret"));
        assert_eq!(out.get("kept"), Some(&FilterValue::Int(2)));
    }

    #[test]
    fn test_hook_error_propagates() {
        let mut reg = ConvertRegistry::new();
        reg.register(
            "bad",
            |_: &FilterValue| -> Result<Conversion, CriterustError> {
                Err(CriterustError::Hook {
                    field: "bad".to_string(),
                    message: "boom".to_string(),
                })
            },
        );
        let err = reg
            .preprocess(values(&[("bad", FilterValue::Int(1))]))
            .unwrap_err();
        assert!(matches!(err, CriterustError::Hook { .. }));
    }

    #[test]
    fn test_hook_only_sees_its_own_field() {
        let mut reg = ConvertRegistry::new();
        reg.register(
            "a",
            |_: &FilterValue| -> Result<Conversion, CriterustError> {
                Ok(Conversion::Keep(FilterValue::Int(99)))
            },
        );
        let out = reg
            .preprocess(values(&[
                ("a", FilterValue::Int(1)),
                ("b", FilterValue::Int(2)),
            ]))
            .unwrap();
        assert_eq!(out.get("a"), Some(&FilterValue::Int(99)));
        assert_eq!(out.get("b"), Some(&FilterValue::Int(2)));
    }
}
