//! Plan compilation
//!
//! The third contract instantiation: everything extracted so far goes into
//! one prompt; the fallback assembles a workable plan from the fingerprint,
//! architecture, and intent alone.

use super::{ExecutablePlan, PlanModule};
use crate::architecture::ArchitectureModel;
use crate::extract::{self, ExtractOptions, Extracted};
use crate::intent::IntentSpecification;
use crate::llm::{GenerationClient, Prompt};
use crate::snapshot::RepositorySnapshot;
use crate::stack::TechnologyFingerprint;

pub async fn compile_plan(
    client: Option<&dyn GenerationClient>,
    snapshot: &RepositorySnapshot,
    fingerprint: &TechnologyFingerprint,
    architecture: &ArchitectureModel,
    intent: &IntentSpecification,
    target_agent: Option<&str>,
    max_retries: u32,
) -> Extracted<ExecutablePlan> {
    let prompt = build_prompt(snapshot, fingerprint, architecture, intent, target_agent);
    let options = ExtractOptions::new(max_retries, &[]);
    extract::extract(client, &prompt, options, || {
        fallback_plan(snapshot, fingerprint, architecture, intent, target_agent)
    })
    .await
}

const SHAPE: &str = r#"{
  "overview": "...",
  "architecture": "...",
  "modules": [{"name": "...", "purpose": "...", "depends_on": ["..."]}],
  "interfaces": ["..."],
  "data_models": ["..."],
  "behavior_rules": ["..."],
  "build_steps": ["..."],
  "test_expectations": ["..."],
  "constraints": ["..."],
  "non_goals": ["..."]
}"#;

fn build_prompt(
    snapshot: &RepositorySnapshot,
    fingerprint: &TechnologyFingerprint,
    architecture: &ArchitectureModel,
    intent: &IntentSpecification,
    target_agent: Option<&str>,
) -> Prompt {
    let stack_json = serde_json::to_string(fingerprint).unwrap_or_else(|_| "{}".to_string());
    let architecture_json =
        serde_json::to_string(architecture).unwrap_or_else(|_| "{}".to_string());
    let intent_json = serde_json::to_string(intent).unwrap_or_else(|_| "{}".to_string());
    let tree_sample = snapshot
        .tree
        .iter()
        .take(80)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    let agent_note = target_agent
        .map(|agent| format!("The plan will be executed by: {}.\n", agent))
        .unwrap_or_default();

    let user = format!(
        r#"Compile an executable build plan for re-implementing "{name}".
{agent_note}
Return a JSON object with exactly this shape:
{shape}

Build steps must be concrete shell-level actions in execution order.

Detected stack:
{stack}

Architecture:
{architecture}

Intent:
{intent}

File tree:
{tree}"#,
        name = snapshot.name(),
        agent_note = agent_note,
        shape = SHAPE,
        stack = stack_json,
        architecture = architecture_json,
        intent = intent_json,
        tree = tree_sample,
    );

    Prompt::json_only(user)
}

/// Ecosystem-specific default build steps, keyed by manifest presence.
const BUILD_STEP_TABLE: &[(&str, &[&str])] = &[
    ("package.json", &["npm install", "npm run build", "npm test"]),
    ("Cargo.toml", &["cargo build --release", "cargo test"]),
    (
        "requirements.txt",
        &["pip install -r requirements.txt", "pytest"],
    ),
    ("pyproject.toml", &["pip install -e .", "pytest"]),
    ("go.mod", &["go build ./...", "go test ./..."]),
    ("pom.xml", &["mvn package", "mvn test"]),
    ("build.gradle", &["gradle build", "gradle test"]),
    ("build.gradle.kts", &["gradle build", "gradle test"]),
    ("Gemfile", &["bundle install", "bundle exec rake test"]),
    ("composer.json", &["composer install", "composer test"]),
];

pub fn fallback_plan(
    snapshot: &RepositorySnapshot,
    fingerprint: &TechnologyFingerprint,
    architecture: &ArchitectureModel,
    intent: &IntentSpecification,
    target_agent: Option<&str>,
) -> ExecutablePlan {
    let architecture_text = architecture
        .components
        .iter()
        .map(|c| format!("{} ({})", c.name, c.role))
        .collect::<Vec<_>>()
        .join(", ");

    let modules = architecture
        .components
        .iter()
        .map(|component| PlanModule {
            name: component.id.clone(),
            purpose: format!("{} ({})", component.name, component.role),
            depends_on: architecture
                .edges
                .iter()
                .filter(|e| e.from == component.id)
                .map(|e| e.to.clone())
                .collect(),
        })
        .collect();

    let interfaces = architecture
        .edges
        .iter()
        .map(|e| format!("{} -> {} ({})", e.from, e.to, e.kind))
        .collect();

    let data_models = if intent.data_contracts.is_empty() {
        fingerprint
            .data_store
            .iter()
            .map(|item| format!("Persistent data held in {}", item.name))
            .collect()
    } else {
        intent.data_contracts.clone()
    };

    let behavior_rules = if intent.rules.is_empty() {
        vec!["Preserve the behavior described in the intent specification".to_string()]
    } else {
        intent.rules.clone()
    };

    let build_steps = BUILD_STEP_TABLE
        .iter()
        .find(|(manifest, _)| snapshot.files.iter().any(|f| f.file_name() == *manifest))
        .map(|(_, steps)| steps.iter().map(|s| s.to_string()).collect())
        .unwrap_or_else(|| vec!["Document the build procedure by hand".to_string()]);

    let mut constraints: Vec<String> = fingerprint
        .items()
        .filter_map(|item| {
            item.version
                .as_ref()
                .map(|version| format!("Pin {} to {}", item.name, version))
        })
        .collect();
    if let Some(agent) = target_agent {
        constraints.push(format!("Plan addressed to {}", agent));
    }

    ExecutablePlan {
        overview: intent.purpose.clone(),
        architecture: if architecture_text.is_empty() {
            format!("Single-component application {}", snapshot.name())
        } else {
            architecture_text
        },
        modules,
        interfaces,
        data_models,
        behavior_rules,
        build_steps,
        test_expectations: vec![
            "Automated test suite passes after every build step".to_string(),
            "Key user flows are exercised end to end".to_string(),
        ],
        constraints,
        non_goals: vec![
            "No production deployment automation".to_string(),
            "No performance tuning beyond framework defaults".to_string(),
        ],
    }
}
