//! Intent extraction
//!
//! Files are ordered by a fixed relevance ranking before packing, so the
//! prompt spends its budget on the highest-signal content. The same
//! contract also serves the swap engine's scoped rewrite.

use std::collections::BTreeMap;

use super::IntentSpecification;
use crate::architecture::ArchitectureModel;
use crate::extract::{self, ExtractOptions, Extracted};
use crate::llm::{pack_files, GenerationClient, Prompt, PromptBudget};
use crate::snapshot::{FileSample, RepositorySnapshot};
use crate::stack::StackCategory;

/// Fixed relevance ranking, best first.
fn file_priority(path: &str) -> u8 {
    let lower = path.to_ascii_lowercase();
    let name = lower.rsplit('/').next().unwrap_or(&lower);

    if name.starts_with("readme") {
        0
    } else if name.ends_with(".sql")
        || name.ends_with(".prisma")
        || name.ends_with(".graphql")
        || lower.contains("schema")
        || lower.contains("migration")
        || lower.contains("model")
    {
        1
    } else if lower.contains("api")
        || lower.contains("route")
        || lower.contains("router")
        || lower.contains("controller")
        || lower.contains("handler")
    {
        2
    } else if name.starts_with(".env")
        || lower.contains("config")
        || lower.contains("settings")
    {
        3
    } else if crate::stack::manifests::rule_for(path.rsplit('/').next().unwrap_or(path)).is_some()
    {
        4
    } else if lower.contains("pages/") || lower.contains("app/") || lower.contains("views/") {
        5
    } else {
        6
    }
}

/// Stable sort by the fixed ranking; original order breaks ties.
pub fn prioritized_files(snapshot: &RepositorySnapshot) -> Vec<&FileSample> {
    let mut files: Vec<&FileSample> = snapshot.files.iter().collect();
    files.sort_by_key(|f| file_priority(&f.path));
    files
}

pub async fn extract_intent(
    client: Option<&dyn GenerationClient>,
    snapshot: &RepositorySnapshot,
    architecture: &ArchitectureModel,
    max_retries: u32,
    budget: &PromptBudget,
) -> Extracted<IntentSpecification> {
    let prompt = build_prompt(snapshot, architecture, budget);
    let options = ExtractOptions::new(max_retries, &[]);
    extract::extract(client, &prompt, options, || fallback_intent(snapshot)).await
}

const SHAPE: &str = r#"{
  "purpose": "one paragraph",
  "features": ["..."],
  "flows": ["..."],
  "rules": ["..."],
  "data_contracts": ["..."],
  "invariants": ["..."],
  "assumptions": ["..."],
  "unknowns": ["..."],
  "confidence": {"features": 0.0, "flows": 0.0, "rules": 0.0, "data_contracts": 0.0}
}"#;

fn build_prompt(
    snapshot: &RepositorySnapshot,
    architecture: &ArchitectureModel,
    budget: &PromptBudget,
) -> Prompt {
    let architecture_json =
        serde_json::to_string(architecture).unwrap_or_else(|_| "{}".to_string());
    let packed = pack_files(prioritized_files(snapshot), budget);

    let user = format!(
        r#"Describe the behavioral intent of the repository "{name}".

Return a JSON object with exactly this shape:
{shape}

State observed behavior, not aspirations. Anything you cannot support with
the provided content belongs in "assumptions" or "unknowns".

Architecture:
{architecture}

Selected file contents, most relevant first:
{files}"#,
        name = snapshot.name(),
        shape = SHAPE,
        architecture = architecture_json,
        files = packed,
    );

    Prompt::json_only(user)
}

/// Deterministic fallback: README text and file paths stand in for the
/// service's reading of the code.
pub fn fallback_intent(snapshot: &RepositorySnapshot) -> IntentSpecification {
    let purpose = snapshot
        .readme()
        .and_then(|readme| {
            readme
                .content
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string)
        })
        .or_else(|| snapshot.metadata.description.clone())
        .unwrap_or_else(|| format!("Software repository {}", snapshot.name()));

    let features: Vec<String> = snapshot
        .tree
        .iter()
        .filter(|path| {
            let lower = path.to_ascii_lowercase();
            lower.contains("api") || lower.contains("route") || lower.contains("pages/")
        })
        .take(12)
        .map(|path| format!("Serves {}", path))
        .collect();

    let data_contracts: Vec<String> = snapshot
        .tree
        .iter()
        .filter(|path| {
            let lower = path.to_ascii_lowercase();
            lower.ends_with(".sql") || lower.ends_with(".prisma") || lower.contains("schema")
        })
        .take(8)
        .map(|path| format!("Schema defined in {}", path))
        .collect();

    let mut confidence = BTreeMap::new();
    for section in ["features", "flows", "rules", "data_contracts"] {
        confidence.insert(section.to_string(), 0.3);
    }

    IntentSpecification {
        purpose,
        features,
        flows: vec![],
        rules: vec![],
        data_contracts,
        invariants: vec![],
        assumptions: vec![
            "Derived heuristically from file paths and README content".to_string(),
        ],
        unknowns: vec!["Runtime behavior was not analyzed".to_string()],
        confidence,
    }
}

/// Swap descriptor handed to the scoped rewrite.
#[derive(Debug, Clone)]
pub struct SwapBrief<'a> {
    pub category: StackCategory,
    pub from: &'a str,
    pub to: &'a str,
    pub hints: &'a [&'static str],
    pub target_agent: Option<&'a str>,
}

/// Rewrites only the swap-impacted sections of a prior intent. Same
/// contract as a full extraction, different prompt and fallback.
pub async fn rewrite_intent_for_swap(
    client: Option<&dyn GenerationClient>,
    brief: &SwapBrief<'_>,
    architecture: &ArchitectureModel,
    prior: &IntentSpecification,
    snapshot: &RepositorySnapshot,
    max_retries: u32,
) -> Extracted<IntentSpecification> {
    let prompt = build_swap_prompt(brief, architecture, prior, snapshot);
    let options = ExtractOptions::new(max_retries, &[]);
    extract::extract(client, &prompt, options, || {
        fallback_swap_intent(brief, prior)
    })
    .await
}

fn build_swap_prompt(
    brief: &SwapBrief<'_>,
    architecture: &ArchitectureModel,
    prior: &IntentSpecification,
    snapshot: &RepositorySnapshot,
) -> Prompt {
    let architecture_json =
        serde_json::to_string(architecture).unwrap_or_else(|_| "{}".to_string());
    let prior_json = serde_json::to_string(prior).unwrap_or_else(|_| "{}".to_string());
    let hints = if brief.hints.is_empty() {
        "none".to_string()
    } else {
        brief.hints.join("; ")
    };
    let agent_note = brief
        .target_agent
        .map(|agent| format!("The revised plan will be executed by: {}.\n", agent))
        .unwrap_or_default();

    let user = format!(
        r#"The {category} technology of "{name}" is being swapped: {from} -> {to}.
Migration hints: {hints}
{agent_note}
Rewrite ONLY the sections of the intent specification impacted by this swap
(data contracts, rules, flows that mention the technology). Keep every other
section verbatim. Do not re-derive the specification from scratch.

Return the complete updated intent as a JSON object with the same shape as
the prior intent below.

Updated architecture:
{architecture}

Prior intent:
{prior}"#,
        category = brief.category,
        name = snapshot.name(),
        from = brief.from,
        to = brief.to,
        hints = hints,
        agent_note = agent_note,
        architecture = architecture_json,
        prior = prior_json,
    );

    Prompt::json_only(user)
}

/// Fallback rewrite: textual substitution plus an explicit migration note.
fn fallback_swap_intent(brief: &SwapBrief<'_>, prior: &IntentSpecification) -> IntentSpecification {
    let swap_text = |text: &String| text.replace(brief.from, brief.to);

    let mut updated = IntentSpecification {
        purpose: swap_text(&prior.purpose),
        features: prior.features.iter().map(swap_text).collect(),
        flows: prior.flows.iter().map(swap_text).collect(),
        rules: prior.rules.iter().map(swap_text).collect(),
        data_contracts: prior.data_contracts.iter().map(swap_text).collect(),
        invariants: prior.invariants.iter().map(swap_text).collect(),
        assumptions: prior.assumptions.clone(),
        unknowns: prior.unknowns.clone(),
        confidence: prior.confidence.clone(),
    };
    updated.assumptions.push(format!(
        "{} swap: {} replaced by {}",
        brief.category, brief.from, brief.to
    ));
    updated
}
