//! Run aggregate
//!
//! A [`RunResult`] is the durable record of one pipeline invocation. It is
//! never mutated in place: a recompile or stack swap produces a new value,
//! carrying the snapshot over unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::architecture::ArchitectureModel;
use crate::intent::IntentSpecification;
use crate::pipeline::StageState;
use crate::plan::ExecutablePlan;
use crate::snapshot::RepositorySnapshot;
use crate::stack::TechnologyFingerprint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub snapshot: RepositorySnapshot,
    pub fingerprint: TechnologyFingerprint,
    pub architecture: ArchitectureModel,
    pub intent: IntentSpecification,
    pub plan: ExecutablePlan,
    /// Rendered form of `plan`; reproducible via [`crate::plan::render`]
    pub plan_text: String,
    pub stages: Vec<StageState>,
}

impl RunResult {
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Stage ids in recorded order, for display and assertions.
    pub fn stage_ids(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(RunResult::new_id(), RunResult::new_id());
    }
}
