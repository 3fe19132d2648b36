//! Ingestion boundary
//!
//! The core consumes a [`crate::snapshot::RepositorySnapshot`] and never
//! inspects filesystem or network-transport details itself. This trait is
//! the whole contract; implementations are thin I/O wrappers.

pub mod local;

pub use local::LocalIngestor;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::snapshot::{FileSample, RepositorySnapshot, ScanMode};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("repository path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("remote fetch is not supported by this ingestor")]
    FetchUnsupported,

    #[error("remote intake failed: {0}")]
    Intake(String),

    #[error("repository too large: {0}")]
    TooLarge(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Raw content bundle produced by the fetch stage, before snapshot assembly.
#[derive(Debug, Clone)]
pub struct FetchedTree {
    pub url: String,
    pub files: Vec<FileSample>,
    pub default_branch: Option<String>,
}

#[async_trait]
pub trait RepositoryIngestor: Send + Sync {
    /// Whether a capable fetch tool is available; decides the remote stage
    /// plan once, before the run starts.
    fn supports_remote_fetch(&self) -> bool {
        false
    }

    async fn ingest_local(
        &self,
        path: &Path,
        mode: ScanMode,
    ) -> Result<RepositorySnapshot, IngestError>;

    async fn fetch_remote(&self, _url: &str) -> Result<FetchedTree, IngestError> {
        Err(IngestError::FetchUnsupported)
    }

    async fn ingest_fetched(
        &self,
        _fetched: FetchedTree,
        _mode: ScanMode,
    ) -> Result<RepositorySnapshot, IngestError> {
        Err(IngestError::FetchUnsupported)
    }

    /// Legacy content-API path: fetch and assemble in one step.
    async fn intake_remote(
        &self,
        url: &str,
        _mode: ScanMode,
    ) -> Result<RepositorySnapshot, IngestError> {
        Err(IngestError::Intake(format!(
            "no content-API client configured for {}",
            url
        )))
    }
}
