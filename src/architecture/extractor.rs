//! Architecture extraction
//!
//! A fixed instantiation of the extraction contract: snapshot-derived
//! prompt, the [`ArchitectureModel`] schema, and a fingerprint-derived
//! fallback producer.

use super::{ArchitectureModel, Component, Edge, EdgeKind};
use crate::extract::{self, DriftRule, ExtractOptions, Extracted};
use crate::llm::{pack_files, GenerationClient, Prompt, PromptBudget};
use crate::snapshot::RepositorySnapshot;
use crate::stack::{StackCategory, TechnologyFingerprint};

/// Models like to return edge scalars as one-element lists.
pub const EDGE_DRIFT_RULES: &[DriftRule] = &[
    DriftRule::scalar("from"),
    DriftRule::scalar("to"),
    DriftRule::scalar("type"),
];

pub async fn extract_architecture(
    client: Option<&dyn GenerationClient>,
    snapshot: &RepositorySnapshot,
    fingerprint: &TechnologyFingerprint,
    max_retries: u32,
    budget: &PromptBudget,
) -> Extracted<ArchitectureModel> {
    let prompt = build_prompt(snapshot, fingerprint, budget);
    let options = ExtractOptions::new(max_retries, EDGE_DRIFT_RULES);
    extract::extract(client, &prompt, options, || {
        fallback_architecture(snapshot, fingerprint)
    })
    .await
}

fn build_prompt(
    snapshot: &RepositorySnapshot,
    fingerprint: &TechnologyFingerprint,
    budget: &PromptBudget,
) -> Prompt {
    let stack_summary =
        serde_json::to_string(fingerprint).unwrap_or_else(|_| "{}".to_string());
    let tree_sample = snapshot
        .tree
        .iter()
        .take(120)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    let packed = pack_files(snapshot.files.iter(), budget);

    let user = format!(
        r#"Derive the component architecture of the repository "{name}".

Return a JSON object with exactly this shape:
{{
  "components": [{{"id": "...", "name": "...", "role": "...", "tech": ["..."], "inputs": ["..."], "outputs": ["..."], "confidence": 0.0}}],
  "edges": [{{"from": "<component id>", "to": "<component id>", "type": "request|data|event"}}]
}}

Component roles are short nouns such as "client", "api", "persistence",
"identity", "runtime". Edge "from"/"to" must be component ids.

Detected stack:
{stack}

File tree:
{tree}

Selected file contents:
{files}"#,
        name = snapshot.name(),
        stack = stack_summary,
        tree = tree_sample,
        files = packed,
    );

    Prompt::json_only(user)
}

/// Deterministic fallback: one component per detected stack category, wired
/// with a fixed edge template. Edges are emitted whenever either endpoint
/// exists, so an edge can reference a component the template did not create.
pub fn fallback_architecture(
    snapshot: &RepositorySnapshot,
    fingerprint: &TechnologyFingerprint,
) -> ArchitectureModel {
    let mut components = Vec::new();

    let mut push_from_category =
        |category: StackCategory, id: &str, role: &str| {
            if let Some(top) = fingerprint.top(category) {
                components.push(Component {
                    id: id.to_string(),
                    name: top.name.clone(),
                    role: role.to_string(),
                    tech: fingerprint
                        .category(category)
                        .iter()
                        .map(|i| i.name.clone())
                        .collect(),
                    inputs: vec![],
                    outputs: vec![],
                    confidence: Some(top.confidence),
                });
            }
        };

    push_from_category(StackCategory::Frontend, "web", "client");
    push_from_category(StackCategory::Backend, "api", "api");
    push_from_category(StackCategory::DataStore, "database", "persistence");
    push_from_category(StackCategory::Auth, "auth", "identity");
    push_from_category(StackCategory::Infrastructure, "runtime", "runtime");

    if components.is_empty() {
        components.push(Component {
            id: "app".to_string(),
            name: snapshot.name().to_string(),
            role: "application".to_string(),
            tech: fingerprint
                .language
                .iter()
                .map(|i| i.name.clone())
                .collect(),
            inputs: vec![],
            outputs: vec![],
            confidence: None,
        });
    }

    let exists = |id: &str| components.iter().any(|c| c.id == id);
    let mut edges = Vec::new();
    for (from, to, kind) in [
        ("web", "api", EdgeKind::Request),
        ("api", "database", EdgeKind::Data),
        ("api", "auth", EdgeKind::Request),
    ] {
        if exists(from) || exists(to) {
            edges.push(Edge {
                from: from.to_string(),
                to: to.to_string(),
                kind,
            });
        }
    }

    ArchitectureModel { components, edges }
}
