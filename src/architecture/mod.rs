//! Architecture graph artifact
//!
//! Components and the edges between them, extracted live or derived from
//! the fingerprint by the fallback producer.

pub mod extractor;

pub use extractor::extract_architecture;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::extract::{SchemaError, Validate};

/// Relationship kind between two components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Request,
    Data,
    Event,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Request => write!(f, "request"),
            EdgeKind::Data => write!(f, "data"),
            EdgeKind::Event => write!(f, "event"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    /// Free-text role, e.g. "client", "api", "persistence"
    pub role: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureModel {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl ArchitectureModel {
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Edges whose endpoints do not resolve to a component id. The schema
    /// check does not reject these (see DESIGN.md); callers who care can ask.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        let ids: HashSet<&str> = self.components.iter().map(|c| c.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|e| !ids.contains(e.from.as_str()) || !ids.contains(e.to.as_str()))
            .collect()
    }
}

impl Validate for ArchitectureModel {
    fn validate(&self) -> Result<(), SchemaError> {
        if self.components.is_empty() {
            return Err(SchemaError::MissingField("components"));
        }
        let mut seen = HashSet::new();
        for component in &self.components {
            if component.id.trim().is_empty() {
                return Err(SchemaError::MissingField("components[].id"));
            }
            if component.name.trim().is_empty() {
                return Err(SchemaError::MissingField("components[].name"));
            }
            if !seen.insert(component.id.as_str()) {
                return Err(SchemaError::Invalid {
                    field: "components[].id",
                    reason: format!("duplicate component id: {}", component.id),
                });
            }
        }
        for edge in &self.edges {
            if edge.from.trim().is_empty() || edge.to.trim().is_empty() {
                return Err(SchemaError::MissingField("edges[].from/to"));
            }
        }
        Ok(())
    }
}
