//! Stack swap engine
//!
//! Incrementally rewrites fingerprint, architecture, intent, and plan after
//! a single technology substitution, without re-reading the source
//! repository. Cost is bounded to exactly two external-service calls.

pub mod registry;

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::architecture::ArchitectureModel;
use crate::intent::{rewrite_intent_for_swap, SwapBrief};
use crate::llm::GenerationClient;
use crate::pipeline::{StageId, StageTracker};
use crate::plan::{compile_plan, render};
use crate::run::RunResult;
use crate::stack::merge::round2;
use crate::stack::{StackCategory, StackItem, TechnologyFingerprint};
use crate::store::RunStore;

const CONFIDENCE_PENALTY: f32 = 0.05;
const CONFIDENCE_FLOOR: f32 = 0.55;
const SYNTHETIC_CONFIDENCE: f32 = 0.58;

/// Precondition failures, surfaced before any cloning begins.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("unknown run id: {0}")]
    UnknownRun(String),

    #[error("current technology name must not be blank")]
    BlankCurrent,

    #[error("replacement technology name must not be blank")]
    BlankReplacement,
}

#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub category: StackCategory,
    pub current: String,
    pub replacement: String,
    pub target_agent: Option<String>,
}

pub struct SwapEngine {
    store: Arc<dyn RunStore>,
    client: Option<Arc<dyn GenerationClient>>,
    max_retries: u32,
}

impl SwapEngine {
    pub fn new(store: Arc<dyn RunStore>, client: Option<Arc<dyn GenerationClient>>) -> Self {
        Self {
            store,
            client,
            max_retries: 2,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Performs the swap against a stored run and stores the new result.
    /// All-or-nothing: a rejected precondition leaves the prior result
    /// untouched.
    pub async fn swap(&self, run_id: &str, request: &SwapRequest) -> Result<RunResult, SwapError> {
        if request.current.trim().is_empty() {
            return Err(SwapError::BlankCurrent);
        }
        if request.replacement.trim().is_empty() {
            return Err(SwapError::BlankReplacement);
        }
        let prior = self
            .store
            .get(run_id)
            .ok_or_else(|| SwapError::UnknownRun(run_id.to_string()))?;

        info!(
            "swapping {} {} -> {} on run {}",
            request.category, request.current, request.replacement, run_id
        );

        let fingerprint = swapped_fingerprint(&prior.fingerprint, request);
        let architecture = swapped_architecture(&prior.architecture, request);

        let hints = registry::migration_hints(&request.current, &request.replacement);
        let brief = SwapBrief {
            category: request.category,
            from: &request.current,
            to: &request.replacement,
            hints: &hints,
            target_agent: request.target_agent.as_deref(),
        };

        let mut tracker = StageTracker::new(&[StageId::Intent, StageId::Plan]);
        let client = self.client.as_deref();

        tracker.begin(StageId::Intent);
        let intent = rewrite_intent_for_swap(
            client,
            &brief,
            &architecture,
            &prior.intent,
            &prior.snapshot,
            self.max_retries,
        )
        .await
        .into_inner();
        tracker.complete(StageId::Intent);

        tracker.begin(StageId::Plan);
        let plan = compile_plan(
            client,
            &prior.snapshot,
            &fingerprint,
            &architecture,
            &intent,
            request.target_agent.as_deref(),
            self.max_retries,
        )
        .await
        .into_inner();
        tracker.complete(StageId::Plan);

        let plan_text = render(&plan);

        let run = RunResult {
            id: RunResult::new_id(),
            created_at: Utc::now(),
            snapshot: prior.snapshot,
            fingerprint,
            architecture,
            intent,
            plan,
            plan_text,
            stages: tracker.into_states(),
        };

        self.store.put(run.clone());
        Ok(run)
    }
}

/// Step 1: rename the matched item with a confidence penalty, or insert a
/// synthetic item at the front of the category.
fn swapped_fingerprint(
    prior: &TechnologyFingerprint,
    request: &SwapRequest,
) -> TechnologyFingerprint {
    let mut fingerprint = prior.clone();
    let items = fingerprint.category_mut(request.category);

    match items
        .iter_mut()
        .find(|item| item.name.eq_ignore_ascii_case(&request.current))
    {
        Some(item) => {
            item.name = request.replacement.clone();
            item.version = None;
            item.confidence = round2((item.confidence - CONFIDENCE_PENALTY).max(CONFIDENCE_FLOOR));
            item.evidence.push(format!(
                "swapped from {} to {}",
                request.current, request.replacement
            ));
        }
        None => {
            items.insert(
                0,
                StackItem {
                    category: request.category,
                    name: request.replacement.clone(),
                    version: None,
                    confidence: SYNTHETIC_CONFIDENCE,
                    evidence: vec![format!(
                        "introduced by stack swap, replacing {}",
                        request.current
                    )],
                },
            );
        }
    }

    fingerprint
}

/// Step 2: rewrite tech entries on components matched by tech name or by
/// the category's role keywords.
fn swapped_architecture(prior: &ArchitectureModel, request: &SwapRequest) -> ArchitectureModel {
    let keywords = role_keywords(request.category);
    let mut architecture = prior.clone();

    for component in &mut architecture.components {
        let tech_match = component
            .tech
            .iter()
            .any(|tech| tech.eq_ignore_ascii_case(&request.current));
        let role = component.role.to_ascii_lowercase();
        let role_match = keywords.iter().any(|keyword| role.contains(keyword));

        if !tech_match && !role_match {
            continue;
        }

        let mut replaced = false;
        for tech in &mut component.tech {
            if tech.eq_ignore_ascii_case(&request.current) {
                *tech = request.replacement.clone();
                replaced = true;
            }
        }
        // A role-matched component must still carry the incoming technology
        if !replaced {
            component.tech.push(request.replacement.clone());
        }
    }

    architecture
}

fn role_keywords(category: StackCategory) -> &'static [&'static str] {
    match category {
        StackCategory::Frontend => &["client"],
        StackCategory::Backend => &["api", "application"],
        StackCategory::DataStore => &["persist"],
        StackCategory::Auth => &["identity"],
        StackCategory::Infrastructure => &["runtime"],
        StackCategory::Language => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::architecture::{Component, Edge, EdgeKind};

    fn request(current: &str, replacement: &str) -> SwapRequest {
        SwapRequest {
            category: StackCategory::DataStore,
            current: current.to_string(),
            replacement: replacement.to_string(),
            target_agent: None,
        }
    }

    fn fingerprint_with(name: &str, confidence: f32) -> TechnologyFingerprint {
        let mut fingerprint = TechnologyFingerprint::default();
        fingerprint.data_store.push(StackItem {
            category: StackCategory::DataStore,
            name: name.to_string(),
            version: Some("8.0".to_string()),
            confidence,
            evidence: vec!["manifest".to_string()],
        });
        fingerprint
    }

    #[test]
    fn test_swap_renames_with_penalty() {
        let prior = fingerprint_with("MongoDB", 0.85);
        let swapped = swapped_fingerprint(&prior, &request("mongodb", "PostgreSQL"));

        let item = &swapped.data_store[0];
        assert_eq!(item.name, "PostgreSQL");
        assert_eq!(item.confidence, 0.8);
        assert_eq!(item.version, None);
        assert!(item.evidence.last().unwrap().contains("swapped from mongodb"));
        // prior untouched
        assert_eq!(prior.data_store[0].name, "MongoDB");
    }

    #[test]
    fn test_swap_penalty_floors_at_055() {
        let prior = fingerprint_with("MongoDB", 0.56);
        let swapped = swapped_fingerprint(&prior, &request("MongoDB", "PostgreSQL"));
        assert_eq!(swapped.data_store[0].confidence, 0.55);
    }

    #[test]
    fn test_swap_inserts_synthetic_item_at_front() {
        let prior = fingerprint_with("Redis", 0.7);
        let swapped = swapped_fingerprint(&prior, &request("MongoDB", "PostgreSQL"));

        assert_eq!(swapped.data_store.len(), 2);
        let front = &swapped.data_store[0];
        assert_eq!(front.name, "PostgreSQL");
        assert_eq!(front.confidence, 0.58);
    }

    fn architecture_fixture() -> ArchitectureModel {
        ArchitectureModel {
            components: vec![
                Component {
                    id: "api".to_string(),
                    name: "API".to_string(),
                    role: "api".to_string(),
                    tech: vec!["Express".to_string(), "MongoDB".to_string()],
                    inputs: vec![],
                    outputs: vec![],
                    confidence: None,
                },
                Component {
                    id: "database".to_string(),
                    name: "MongoDB".to_string(),
                    role: "persistence".to_string(),
                    tech: vec!["MongoDB".to_string()],
                    inputs: vec![],
                    outputs: vec![],
                    confidence: None,
                },
                Component {
                    id: "web".to_string(),
                    name: "Web".to_string(),
                    role: "client".to_string(),
                    tech: vec!["React".to_string()],
                    inputs: vec![],
                    outputs: vec![],
                    confidence: None,
                },
            ],
            edges: vec![Edge {
                from: "api".to_string(),
                to: "database".to_string(),
                kind: EdgeKind::Data,
            }],
        }
    }

    #[test]
    fn test_architecture_tech_entries_rewritten() {
        let swapped =
            swapped_architecture(&architecture_fixture(), &request("MongoDB", "PostgreSQL"));

        let api = swapped.component("api").unwrap();
        assert_eq!(api.tech, vec!["Express".to_string(), "PostgreSQL".to_string()]);

        let database = swapped.component("database").unwrap();
        assert_eq!(database.tech, vec!["PostgreSQL".to_string()]);

        // Unrelated client component untouched
        let web = swapped.component("web").unwrap();
        assert_eq!(web.tech, vec!["React".to_string()]);
    }

    #[test]
    fn test_role_matched_component_gains_replacement() {
        let mut prior = architecture_fixture();
        // persistence component that never mentions the outgoing tech
        prior.components[1].tech = vec!["Some ORM".to_string()];

        let swapped = swapped_architecture(&prior, &request("MongoDB", "PostgreSQL"));
        let database = swapped.component("database").unwrap();
        assert!(database.tech.contains(&"PostgreSQL".to_string()));
    }
}
