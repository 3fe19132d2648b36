//! Behavioral-intent artifact
//!
//! What the repository is *for*: purpose, features, flows, rules, data
//! contracts, plus explicit assumptions and unknowns. List order is
//! preserved but carries no meaning beyond display.

pub mod extractor;

pub use extractor::{extract_intent, rewrite_intent_for_swap, SwapBrief};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::extract::{SchemaError, Validate};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentSpecification {
    pub purpose: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub flows: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub data_contracts: Vec<String>,
    #[serde(default)]
    pub invariants: Vec<String>,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub unknowns: Vec<String>,
    /// Per-section confidence, keyed by section name
    #[serde(default)]
    pub confidence: BTreeMap<String, f32>,
}

impl Validate for IntentSpecification {
    fn validate(&self) -> Result<(), SchemaError> {
        if self.purpose.trim().is_empty() {
            return Err(SchemaError::MissingField("purpose"));
        }
        for (section, value) in &self.confidence {
            if !(0.0..=1.0).contains(value) {
                return Err(SchemaError::Invalid {
                    field: "confidence",
                    reason: format!("section {} outside [0, 1]: {}", section, value),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_purpose() {
        let intent = IntentSpecification::default();
        assert!(intent.validate().is_err());

        let intent = IntentSpecification {
            purpose: "A storefront".to_string(),
            ..Default::default()
        };
        assert!(intent.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let mut intent = IntentSpecification {
            purpose: "x".to_string(),
            ..Default::default()
        };
        intent.confidence.insert("features".to_string(), 1.3);
        assert!(intent.validate().is_err());
    }
}
