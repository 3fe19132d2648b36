//! Technology fingerprinting
//!
//! The stack detector is a pure function from a repository snapshot to a
//! [`TechnologyFingerprint`]: per-category, confidence-scored technology
//! detections merged from manifest-parser findings and language byte shares.
//! No external calls, no randomness.

pub mod detector;
pub mod manifests;
pub mod merge;

pub use detector::detect;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Detection categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackCategory {
    Frontend,
    Backend,
    DataStore,
    Auth,
    Infrastructure,
    Language,
}

impl StackCategory {
    pub const ALL: [StackCategory; 6] = [
        StackCategory::Frontend,
        StackCategory::Backend,
        StackCategory::DataStore,
        StackCategory::Auth,
        StackCategory::Infrastructure,
        StackCategory::Language,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StackCategory::Frontend => "frontend",
            StackCategory::Backend => "backend",
            StackCategory::DataStore => "data-store",
            StackCategory::Auth => "auth",
            StackCategory::Infrastructure => "infrastructure",
            StackCategory::Language => "language",
        }
    }
}

impl fmt::Display for StackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unknown category name error, surfaced at the CLI/swap boundary.
#[derive(Debug, Clone, Error)]
#[error("unknown stack category: {0} (expected frontend|backend|data-store|auth|infrastructure|language)")]
pub struct UnknownCategory(pub String);

impl FromStr for StackCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frontend" => Ok(StackCategory::Frontend),
            "backend" => Ok(StackCategory::Backend),
            "data-store" | "datastore" => Ok(StackCategory::DataStore),
            "auth" => Ok(StackCategory::Auth),
            "infrastructure" | "infra" => Ok(StackCategory::Infrastructure),
            "language" => Ok(StackCategory::Language),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// One piece of evidence for a technology, before merging. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub category: StackCategory,
    pub name: String,
    pub version: Option<String>,
    pub evidence: String,
    pub boost: f32,
}

impl Finding {
    pub fn new(
        category: StackCategory,
        name: impl Into<String>,
        evidence: impl Into<String>,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            version: None,
            evidence: evidence.into(),
            boost: 0.0,
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }
}

/// A merged, confidence-scored detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackItem {
    pub category: StackCategory,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Always within [0, 1], rounded to two decimals
    pub confidence: f32,
    pub evidence: Vec<String>,
}

/// The merged, per-category detection result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TechnologyFingerprint {
    pub frontend: Vec<StackItem>,
    pub backend: Vec<StackItem>,
    pub data_store: Vec<StackItem>,
    pub auth: Vec<StackItem>,
    pub infrastructure: Vec<StackItem>,
    pub language: Vec<StackItem>,
    /// `category:name` tokens for items with confidence low enough to need
    /// manual review
    pub low_confidence: Vec<String>,
}

impl TechnologyFingerprint {
    pub fn category(&self, category: StackCategory) -> &[StackItem] {
        match category {
            StackCategory::Frontend => &self.frontend,
            StackCategory::Backend => &self.backend,
            StackCategory::DataStore => &self.data_store,
            StackCategory::Auth => &self.auth,
            StackCategory::Infrastructure => &self.infrastructure,
            StackCategory::Language => &self.language,
        }
    }

    pub fn category_mut(&mut self, category: StackCategory) -> &mut Vec<StackItem> {
        match category {
            StackCategory::Frontend => &mut self.frontend,
            StackCategory::Backend => &mut self.backend,
            StackCategory::DataStore => &mut self.data_store,
            StackCategory::Auth => &mut self.auth,
            StackCategory::Infrastructure => &mut self.infrastructure,
            StackCategory::Language => &mut self.language,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &StackItem> {
        StackCategory::ALL
            .iter()
            .flat_map(move |c| self.category(*c).iter())
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    /// Highest-confidence item in a category, if any.
    pub fn top(&self, category: StackCategory) -> Option<&StackItem> {
        self.category(category).first()
    }
}
