//! Stage orchestrator
//!
//! Composes ingestion, stack detection, and the three extractors into one
//! ordered run. Stage outputs thread directly into the next stage; a stage
//! failure is fatal to the run and nothing partial is returned. Extraction
//! stages cannot fail (the contract is total), so only ingestion stages
//! carry error paths.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use super::{stage_plan, StageId, StageTracker};
use crate::architecture::extract_architecture;
use crate::ingest::RepositoryIngestor;
use crate::intent::extract_intent;
use crate::llm::{GenerationClient, PromptBudget};
use crate::plan::{compile_plan, render};
use crate::run::RunResult;
use crate::snapshot::{RepoSource, RepositorySnapshot, ScanMode};
use crate::stack;
use crate::store::RunStore;

pub struct Orchestrator {
    ingestor: Arc<dyn RepositoryIngestor>,
    client: Option<Arc<dyn GenerationClient>>,
    store: Arc<dyn RunStore>,
    max_retries: u32,
    budget: PromptBudget,
}

impl Orchestrator {
    pub fn new(
        ingestor: Arc<dyn RepositoryIngestor>,
        client: Option<Arc<dyn GenerationClient>>,
        store: Arc<dyn RunStore>,
    ) -> Self {
        Self {
            ingestor,
            client,
            store,
            max_retries: 2,
            budget: PromptBudget::default(),
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_budget(mut self, budget: PromptBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Runs the full pipeline for one source. The returned RunResult is
    /// also written to the store.
    pub async fn run(&self, source: RepoSource, mode: ScanMode) -> Result<RunResult> {
        let plan = stage_plan(&source, self.ingestor.supports_remote_fetch());
        let mut tracker = StageTracker::new(&plan);

        info!(
            "Starting run for {} ({} stages, {} mode)",
            source.display_name(),
            plan.len(),
            mode
        );

        let snapshot = self.ingestion_stages(&source, mode, &mut tracker).await?;

        tracker.begin(StageId::Stack);
        let fingerprint = stack::detect(&snapshot);
        tracker.complete(StageId::Stack);
        debug!("stack stage done: {} items", fingerprint.item_count());

        let client = self.client.as_deref();

        tracker.begin(StageId::Architecture);
        let architecture = extract_architecture(
            client,
            &snapshot,
            &fingerprint,
            self.max_retries,
            &self.budget,
        )
        .await
        .into_inner();
        tracker.complete(StageId::Architecture);

        tracker.begin(StageId::Intent);
        let intent = extract_intent(
            client,
            &snapshot,
            &architecture,
            self.max_retries,
            &self.budget,
        )
        .await
        .into_inner();
        tracker.complete(StageId::Intent);

        tracker.begin(StageId::Plan);
        let plan_artifact = compile_plan(
            client,
            &snapshot,
            &fingerprint,
            &architecture,
            &intent,
            None,
            self.max_retries,
        )
        .await
        .into_inner();
        tracker.complete(StageId::Plan);

        let plan_text = render(&plan_artifact);

        let run = RunResult {
            id: RunResult::new_id(),
            created_at: chrono::Utc::now(),
            snapshot,
            fingerprint,
            architecture,
            intent,
            plan: plan_artifact,
            plan_text,
            stages: tracker.into_states(),
        };

        info!("Run {} complete", run.id);
        self.store.put(run.clone());
        Ok(run)
    }

    /// Runs whichever ingestion stages the plan calls for and yields the
    /// snapshot. Errors are recorded on the failing stage and re-thrown.
    async fn ingestion_stages(
        &self,
        source: &RepoSource,
        mode: ScanMode,
        tracker: &mut StageTracker,
    ) -> Result<RepositorySnapshot> {
        match source {
            RepoSource::Local { path } => {
                tracker.begin(StageId::Ingest);
                match self.ingestor.ingest_local(path, mode).await {
                    Ok(snapshot) => {
                        tracker.complete(StageId::Ingest);
                        Ok(snapshot)
                    }
                    Err(e) => {
                        let e = anyhow::Error::new(e).context("stage ingest failed");
                        tracker.fail(StageId::Ingest, &e);
                        Err(e)
                    }
                }
            }
            RepoSource::Remote { url } if self.ingestor.supports_remote_fetch() => {
                tracker.begin(StageId::Fetch);
                let fetched = match self.ingestor.fetch_remote(url).await {
                    Ok(fetched) => {
                        tracker.complete(StageId::Fetch);
                        fetched
                    }
                    Err(e) => {
                        let e = anyhow::Error::new(e).context("stage fetch failed");
                        tracker.fail(StageId::Fetch, &e);
                        return Err(e);
                    }
                };

                tracker.begin(StageId::Ingest);
                match self.ingestor.ingest_fetched(fetched, mode).await {
                    Ok(snapshot) => {
                        tracker.complete(StageId::Ingest);
                        Ok(snapshot)
                    }
                    Err(e) => {
                        let e = anyhow::Error::new(e).context("stage ingest failed");
                        tracker.fail(StageId::Ingest, &e);
                        Err(e)
                    }
                }
            }
            RepoSource::Remote { url } => {
                tracker.begin(StageId::Intake);
                match self.ingestor.intake_remote(url, mode).await {
                    Ok(snapshot) => {
                        tracker.complete(StageId::Intake);
                        Ok(snapshot)
                    }
                    Err(e) => {
                        let e = anyhow::Error::new(e).context("stage intake failed");
                        tracker.fail(StageId::Intake, &e);
                        Err(e)
                    }
                }
            }
        }
        .with_context(|| format!("run failed for {}", source.display_name()))
    }
}
