//! End-to-end pipeline behavior through the orchestrator, with scriptable
//! collaborators on both boundaries.

mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use specforge::extract::Validate;
use specforge::llm::mock::{MockGenerationClient, MockReply};
use specforge::pipeline::{Orchestrator, StageStatus};
use specforge::plan::render;
use specforge::snapshot::{RepoSource, ScanMode};
use specforge::store::{MemoryRunStore, RunStore};

use support::{storefront_snapshot, MockIngestor};

fn orchestrator_with(
    ingestor: MockIngestor,
    client: Option<Arc<MockGenerationClient>>,
) -> (Orchestrator, Arc<MemoryRunStore>) {
    let store = Arc::new(MemoryRunStore::new());
    let orchestrator = Orchestrator::new(
        Arc::new(ingestor),
        client.map(|c| c as Arc<dyn specforge::llm::GenerationClient>),
        store.clone(),
    );
    (orchestrator, store)
}

#[tokio::test]
async fn local_run_produces_expected_stage_ids() {
    let (orchestrator, store) =
        orchestrator_with(MockIngestor::new(storefront_snapshot()), None);

    let run = orchestrator
        .run(RepoSource::local("/repos/storefront"), ScanMode::Quick)
        .await
        .unwrap();

    assert_eq!(
        run.stage_ids(),
        vec!["ingest", "stack", "architecture", "intent", "plan"]
    );
    assert!(run
        .stages
        .iter()
        .all(|s| s.status == StageStatus::Done && s.started_at.is_some()));
    assert!(store.get(&run.id).is_some());
}

#[tokio::test]
async fn remote_run_with_fetch_tool_adds_fetch_stage() {
    let ingestor = MockIngestor::new(storefront_snapshot()).with_fetch_support();
    let (orchestrator, _store) = orchestrator_with(ingestor, None);

    let run = orchestrator
        .run(
            RepoSource::remote("https://example.com/acme/storefront.git"),
            ScanMode::Quick,
        )
        .await
        .unwrap();

    assert_eq!(
        run.stage_ids(),
        vec!["fetch", "ingest", "stack", "architecture", "intent", "plan"]
    );
}

#[tokio::test]
async fn remote_run_without_fetch_tool_uses_intake_stage() {
    let (orchestrator, _store) =
        orchestrator_with(MockIngestor::new(storefront_snapshot()), None);

    let run = orchestrator
        .run(
            RepoSource::remote("https://example.com/acme/storefront.git"),
            ScanMode::Quick,
        )
        .await
        .unwrap();

    assert_eq!(
        run.stage_ids(),
        vec!["intake", "stack", "architecture", "intent", "plan"]
    );
}

#[tokio::test]
async fn failed_ingestion_aborts_the_run_before_any_extraction() {
    let client = Arc::new(MockGenerationClient::new());
    let ingestor = Arc::new(MockIngestor::new(storefront_snapshot()).failing());
    let store = Arc::new(MemoryRunStore::new());
    let orchestrator = Orchestrator::new(
        ingestor.clone(),
        Some(client.clone() as Arc<dyn specforge::llm::GenerationClient>),
        store.clone(),
    );

    let result = orchestrator
        .run(RepoSource::local("/repos/storefront"), ScanMode::Quick)
        .await;

    assert!(result.is_err());
    assert_eq!(ingestor.local_calls.load(Ordering::SeqCst), 1);
    // No extraction stage ever ran
    assert_eq!(client.call_count(), 0);
    // No partial run was stored
    assert!(store.list().is_empty());
}

#[tokio::test]
async fn fallback_run_is_schema_valid_with_zero_network_calls() {
    let (orchestrator, _store) =
        orchestrator_with(MockIngestor::new(storefront_snapshot()), None);

    let run = orchestrator
        .run(RepoSource::local("/repos/storefront"), ScanMode::Quick)
        .await
        .unwrap();

    assert!(run.architecture.validate().is_ok());
    assert!(run.intent.validate().is_ok());
    assert!(run.plan.validate().is_ok());
    assert!(!run.fingerprint.frontend.is_empty());
}

#[tokio::test]
async fn garbage_service_responses_still_produce_a_full_run() {
    let client = Arc::new(MockGenerationClient::new());
    // 3 extraction stages x 3 attempts each
    for _ in 0..9 {
        client.add_reply(MockReply::text("the model rambles, no json here"));
    }

    let (orchestrator, _store) = orchestrator_with(
        MockIngestor::new(storefront_snapshot()),
        Some(client.clone()),
    );

    let run = orchestrator
        .run(RepoSource::local("/repos/storefront"), ScanMode::Quick)
        .await
        .unwrap();

    assert_eq!(client.call_count(), 9);
    assert!(run.plan.validate().is_ok());
    assert!(run.stages.iter().all(|s| s.status == StageStatus::Done));
}

#[tokio::test]
async fn live_responses_flow_into_the_artifacts() {
    let client = Arc::new(MockGenerationClient::with_replies(vec![
        MockReply::text(
            r#"{
  "components": [
    {"id": "web", "name": "Storefront UI", "role": "client", "tech": ["Next.js"]},
    {"id": "api", "name": "Orders API", "role": "api", "tech": ["Express"]}
  ],
  "edges": [{"from": "web", "to": "api", "type": "request"}]
}"#,
        ),
        MockReply::text(
            r#"{"purpose": "Sell products online", "features": ["Browse catalog"], "confidence": {"features": 0.9}}"#,
        ),
        MockReply::text(
            r#"{
  "overview": "Rebuild the storefront",
  "architecture": "Two services",
  "modules": [{"name": "web", "purpose": "UI"}],
  "build_steps": ["npm ci", "npm run build"]
}"#,
        ),
    ]));

    let (orchestrator, _store) = orchestrator_with(
        MockIngestor::new(storefront_snapshot()),
        Some(client.clone()),
    );

    let run = orchestrator
        .run(RepoSource::local("/repos/storefront"), ScanMode::Quick)
        .await
        .unwrap();

    assert_eq!(client.call_count(), 3);
    assert_eq!(run.architecture.components.len(), 2);
    assert_eq!(run.intent.purpose, "Sell products online");
    assert_eq!(run.plan.overview, "Rebuild the storefront");
}

#[tokio::test]
async fn plan_text_is_a_pure_rendering_of_the_plan() {
    let (orchestrator, _store) =
        orchestrator_with(MockIngestor::new(storefront_snapshot()), None);

    let run = orchestrator
        .run(RepoSource::local("/repos/storefront"), ScanMode::Quick)
        .await
        .unwrap();

    assert_eq!(run.plan_text, render(&run.plan));
    assert_eq!(render(&run.plan), render(&run.plan));
    for marker in specforge::plan::render::SECTION_MARKERS {
        assert!(run.plan_text.contains(marker), "missing {}", marker);
    }
}

#[tokio::test]
async fn detection_example_next_and_react_versions() {
    let (orchestrator, _store) =
        orchestrator_with(MockIngestor::new(storefront_snapshot()), None);

    let run = orchestrator
        .run(RepoSource::local("/repos/storefront"), ScanMode::Quick)
        .await
        .unwrap();

    let next = run
        .fingerprint
        .frontend
        .iter()
        .find(|i| i.name == "Next.js")
        .unwrap();
    assert_eq!(next.version, Some("14.0.0".to_string()));
    assert!((0.45..=0.99).contains(&next.confidence));

    let react = run
        .fingerprint
        .frontend
        .iter()
        .find(|i| i.name == "React")
        .unwrap();
    assert_eq!(react.version, Some("18.2.0".to_string()));
    assert!((0.45..=0.99).contains(&react.confidence));
}
