//! Pipeline stages and orchestration
//!
//! One run is a fixed, strictly sequential stage list. Each stage records
//! pending to running to done/error transitions with timestamps; the first
//! error aborts the run.

pub mod orchestrator;

pub use orchestrator::Orchestrator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::snapshot::RepoSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageId {
    Fetch,
    Intake,
    Ingest,
    Stack,
    Architecture,
    Intent,
    Plan,
}

impl StageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::Fetch => "fetch",
            StageId::Intake => "intake",
            StageId::Ingest => "ingest",
            StageId::Stack => "stack",
            StageId::Architecture => "architecture",
            StageId::Intent => "intent",
            StageId::Plan => "plan",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StageId::Fetch => "Fetch remote repository",
            StageId::Intake => "Intake via content API",
            StageId::Ingest => "Ingest repository snapshot",
            StageId::Stack => "Detect technology stack",
            StageId::Architecture => "Extract architecture",
            StageId::Intent => "Extract behavioral intent",
            StageId::Plan => "Compile build plan",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Running,
    Done,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageState {
    pub id: StageId,
    pub label: String,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageState {
    pub fn pending(id: StageId) -> Self {
        Self {
            id,
            label: id.label().to_string(),
            status: StageStatus::Pending,
            started_at: None,
            finished_at: None,
            error: None,
        }
    }
}

/// One-time stage list decision, from source kind and fetch capability.
pub fn stage_plan(source: &RepoSource, supports_fetch: bool) -> Vec<StageId> {
    match source {
        RepoSource::Local { .. } => vec![
            StageId::Ingest,
            StageId::Stack,
            StageId::Architecture,
            StageId::Intent,
            StageId::Plan,
        ],
        RepoSource::Remote { .. } if supports_fetch => vec![
            StageId::Fetch,
            StageId::Ingest,
            StageId::Stack,
            StageId::Architecture,
            StageId::Intent,
            StageId::Plan,
        ],
        RepoSource::Remote { .. } => vec![
            StageId::Intake,
            StageId::Stack,
            StageId::Architecture,
            StageId::Intent,
            StageId::Plan,
        ],
    }
}

/// Records stage transitions for one run.
pub(crate) struct StageTracker {
    states: Vec<StageState>,
}

impl StageTracker {
    pub fn new(plan: &[StageId]) -> Self {
        Self {
            states: plan.iter().map(|id| StageState::pending(*id)).collect(),
        }
    }

    fn state_mut(&mut self, id: StageId) -> &mut StageState {
        self.states
            .iter_mut()
            .find(|s| s.id == id)
            .unwrap_or_else(|| panic!("stage {} not in plan", id))
    }

    pub fn begin(&mut self, id: StageId) {
        let state = self.state_mut(id);
        state.status = StageStatus::Running;
        state.started_at = Some(Utc::now());
    }

    pub fn complete(&mut self, id: StageId) {
        let state = self.state_mut(id);
        state.status = StageStatus::Done;
        state.finished_at = Some(Utc::now());
    }

    pub fn fail(&mut self, id: StageId, error: &anyhow::Error) {
        let state = self.state_mut(id);
        state.status = StageStatus::Error;
        state.finished_at = Some(Utc::now());
        state.error = Some(format!("{:#}", error));
    }

    pub fn into_states(self) -> Vec<StageState> {
        self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_stage_plan() {
        let plan = stage_plan(&RepoSource::local("/tmp/repo"), false);
        let ids: Vec<&str> = plan.iter().map(|s| s.as_str()).collect();
        assert_eq!(ids, vec!["ingest", "stack", "architecture", "intent", "plan"]);
    }

    #[test]
    fn test_remote_stage_plan_with_fetch_tool() {
        let plan = stage_plan(&RepoSource::remote("https://example.com/r.git"), true);
        let ids: Vec<&str> = plan.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            ids,
            vec!["fetch", "ingest", "stack", "architecture", "intent", "plan"]
        );
    }

    #[test]
    fn test_remote_stage_plan_without_fetch_tool() {
        let plan = stage_plan(&RepoSource::remote("https://example.com/r.git"), false);
        let ids: Vec<&str> = plan.iter().map(|s| s.as_str()).collect();
        assert_eq!(ids, vec!["intake", "stack", "architecture", "intent", "plan"]);
    }

    #[test]
    fn test_tracker_records_transitions() {
        let mut tracker = StageTracker::new(&[StageId::Ingest, StageId::Stack]);
        tracker.begin(StageId::Ingest);
        tracker.complete(StageId::Ingest);
        tracker.begin(StageId::Stack);
        tracker.fail(StageId::Stack, &anyhow::anyhow!("boom"));

        let states = tracker.into_states();
        assert_eq!(states[0].status, StageStatus::Done);
        assert!(states[0].started_at.is_some());
        assert!(states[0].finished_at.is_some());
        assert_eq!(states[1].status, StageStatus::Error);
        assert!(states[1].error.as_ref().unwrap().contains("boom"));
    }
}
