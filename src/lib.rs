//! specforge - repository snapshots into build-ready artifact bundles
//!
//! This library drives a fixed sequence of extraction stages over a
//! repository snapshot and produces a versioned bundle of artifacts: a
//! detected technology fingerprint, an architecture graph, a
//! behavioral-intent specification, and an executable build plan.
//!
//! # Core Concepts
//!
//! - **Snapshot**: the immutable input: metadata, a capped file tree,
//!   budgeted file contents, and a language byte-share breakdown
//! - **Extraction Contract**: every stage that talks to the external
//!   generation service goes through one capability with JSON recovery,
//!   schema validation, drift repair, bounded retry, and a deterministic
//!   fallback; it never fails from the caller's perspective
//! - **Stack Detection**: a pure, data-driven classifier from manifest
//!   parsers and language shares to a confidence-scored fingerprint
//! - **Stack Swap**: an incremental rewrite of fingerprint, architecture,
//!   intent, and plan after a single technology substitution, without
//!   re-ingesting the repository
//!
//! # Example Usage
//!
//! ```ignore
//! use specforge::config::ForgeConfig;
//! use specforge::ingest::LocalIngestor;
//! use specforge::pipeline::Orchestrator;
//! use specforge::snapshot::{RepoSource, ScanMode};
//! use specforge::store::MemoryRunStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ForgeConfig::from_env()?;
//! let orchestrator = Orchestrator::new(
//!     Arc::new(LocalIngestor::new()),
//!     config.create_client(),
//!     Arc::new(MemoryRunStore::new()),
//! );
//!
//! let run = orchestrator
//!     .run(RepoSource::local("./my-repo"), ScanMode::Quick)
//!     .await?;
//! println!("{}", run.plan_text);
//! # Ok(())
//! # }
//! ```

pub mod architecture;
pub mod cli;
pub mod config;
pub mod extract;
pub mod ingest;
pub mod intent;
pub mod llm;
pub mod pipeline;
pub mod plan;
pub mod run;
pub mod snapshot;
pub mod stack;
pub mod store;
pub mod swap;

// Re-export key types for convenient access
pub use config::{ConfigError, ForgeConfig, Provider};
pub use extract::{Extracted, SchemaError, Validate};
pub use ingest::{IngestError, LocalIngestor, RepositoryIngestor};
pub use llm::{GenerationClient, GenerationError, MockGenerationClient};
pub use pipeline::{Orchestrator, StageId, StageState, StageStatus};
pub use run::RunResult;
pub use snapshot::{RepoSource, RepositorySnapshot, ScanMode};
pub use stack::{StackCategory, TechnologyFingerprint};
pub use store::{MemoryRunStore, RunStore};
pub use swap::{SwapEngine, SwapError, SwapRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_specforge() {
        assert_eq!(NAME, "specforge");
    }
}
