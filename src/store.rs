//! Run store abstraction
//!
//! The orchestrator and swap engine never reach into ambient global state;
//! they are handed a [`RunStore`]. Writes are last-writer-wins: a given run
//! id is written by at most one in-flight operation in normal use.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::run::RunResult;

pub trait RunStore: Send + Sync {
    fn get(&self, id: &str) -> Option<RunResult>;
    fn put(&self, run: RunResult);
    /// All stored runs, oldest first.
    fn list(&self) -> Vec<RunResult>;
}

/// Mutex-guarded in-memory store; the default for CLI runs and tests.
#[derive(Default)]
pub struct MemoryRunStore {
    runs: Mutex<HashMap<String, RunResult>>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunStore for MemoryRunStore {
    fn get(&self, id: &str) -> Option<RunResult> {
        self.runs.lock().unwrap().get(id).cloned()
    }

    fn put(&self, run: RunResult) {
        self.runs.lock().unwrap().insert(run.id.clone(), run);
    }

    fn list(&self) -> Vec<RunResult> {
        let mut runs: Vec<RunResult> = self.runs.lock().unwrap().values().cloned().collect();
        runs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        runs
    }
}
