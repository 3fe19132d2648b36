//! Executable build plan artifact
//!
//! The plan is a structured object plus one plain-text rendering. The
//! rendering is a pure function of the structure: re-rendering without
//! re-extracting reproduces byte-identical text.

pub mod compiler;
pub mod render;

pub use compiler::compile_plan;
pub use render::render;

use serde::{Deserialize, Serialize};

use crate::extract::{SchemaError, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanModule {
    pub name: String,
    pub purpose: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutablePlan {
    pub overview: String,
    pub architecture: String,
    #[serde(default)]
    pub modules: Vec<PlanModule>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub data_models: Vec<String>,
    #[serde(default)]
    pub behavior_rules: Vec<String>,
    #[serde(default)]
    pub build_steps: Vec<String>,
    #[serde(default)]
    pub test_expectations: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub non_goals: Vec<String>,
}

impl Validate for ExecutablePlan {
    fn validate(&self) -> Result<(), SchemaError> {
        if self.overview.trim().is_empty() {
            return Err(SchemaError::MissingField("overview"));
        }
        if self.modules.is_empty() {
            return Err(SchemaError::MissingField("modules"));
        }
        for module in &self.modules {
            if module.name.trim().is_empty() {
                return Err(SchemaError::MissingField("modules[].name"));
            }
        }
        if self.build_steps.is_empty() {
            return Err(SchemaError::MissingField("build_steps"));
        }
        Ok(())
    }
}
