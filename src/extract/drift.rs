//! Schema-drift repair
//!
//! Some models return structurally near-valid JSON: a field specified as a
//! scalar arrives as a single-element list. Repair is a data-driven pass,
//! a small table of (field name, coercion rule) applied recursively before
//! re-validation, so new drift patterns are additive.

use serde_json::Value;

/// Coercion applied to a drifted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// `["request"]` becomes `"request"`
    ScalarFromSingletonList,
}

/// One repair rule: field name plus the coercion for it.
#[derive(Debug, Clone, Copy)]
pub struct DriftRule {
    pub field: &'static str,
    pub coercion: Coercion,
}

impl DriftRule {
    pub const fn scalar(field: &'static str) -> Self {
        Self {
            field,
            coercion: Coercion::ScalarFromSingletonList,
        }
    }
}

/// Walks the value and applies every matching rule. Returns true when
/// anything changed, so the caller knows a re-validation is worth doing.
pub fn repair(value: &mut Value, rules: &[DriftRule]) -> bool {
    if rules.is_empty() {
        return false;
    }
    walk(value, rules)
}

fn walk(value: &mut Value, rules: &[DriftRule]) -> bool {
    let mut changed = false;

    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if let Some(rule) = rules.iter().find(|r| r.field == key) {
                    changed |= apply(entry, rule);
                }
                changed |= walk(entry, rules);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                changed |= walk(item, rules);
            }
        }
        _ => {}
    }

    changed
}

fn apply(entry: &mut Value, rule: &DriftRule) -> bool {
    match rule.coercion {
        Coercion::ScalarFromSingletonList => {
            let single = match entry {
                Value::Array(items) if items.len() == 1 => items.remove(0),
                _ => return false,
            };
            *entry = single;
            true
        }
    }
}
