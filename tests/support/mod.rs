//! Shared test collaborators: a scriptable ingestor and snapshot fixtures.
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use specforge::ingest::{FetchedTree, IngestError, RepositoryIngestor};
use specforge::snapshot::{
    FileSample, LanguageShare, RepoMetadata, RepoSource, RepositorySnapshot, ScanMode,
};

/// A Next.js storefront with a MongoDB data store: enough signal for every
/// detector category.
pub fn storefront_snapshot() -> RepositorySnapshot {
    RepositorySnapshot {
        metadata: RepoMetadata {
            name: "storefront".to_string(),
            source: RepoSource::local("/repos/storefront"),
            description: Some("Demo storefront".to_string()),
            default_branch: Some("main".to_string()),
        },
        tree: vec![
            "package.json".to_string(),
            "README.md".to_string(),
            "pages/index.tsx".to_string(),
            "pages/api/orders.ts".to_string(),
        ],
        files: vec![
            FileSample::new(
                "package.json",
                r#"{
  "name": "storefront",
  "dependencies": {
    "next": "^14.0.0",
    "react": "18.2.0",
    "express": "^4.18.0",
    "mongoose": "^8.0.0",
    "next-auth": "^4.24.0"
  }
}"#,
            ),
            FileSample::new("README.md", "# Storefront\n\nSells things on the internet."),
        ],
        languages: vec![
            LanguageShare {
                language: "TypeScript".to_string(),
                bytes: 80_000,
                share: 0.8,
            },
            LanguageShare {
                language: "CSS".to_string(),
                bytes: 20_000,
                share: 0.2,
            },
        ],
    }
}

/// Scriptable ingestor: serves a fixed snapshot through whichever entry
/// point the stage plan exercises, or fails on demand. Counts calls so
/// tests can assert which stages ran.
pub struct MockIngestor {
    snapshot: RepositorySnapshot,
    supports_fetch: bool,
    fail_ingest: bool,
    pub local_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub intake_calls: AtomicUsize,
}

impl MockIngestor {
    pub fn new(snapshot: RepositorySnapshot) -> Self {
        Self {
            snapshot,
            supports_fetch: false,
            fail_ingest: false,
            local_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            intake_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_fetch_support(mut self) -> Self {
        self.supports_fetch = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_ingest = true;
        self
    }
}

#[async_trait]
impl RepositoryIngestor for MockIngestor {
    fn supports_remote_fetch(&self) -> bool {
        self.supports_fetch
    }

    async fn ingest_local(
        &self,
        path: &Path,
        _mode: ScanMode,
    ) -> Result<RepositorySnapshot, IngestError> {
        self.local_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_ingest {
            return Err(IngestError::PathNotFound(path.to_path_buf()));
        }
        Ok(self.snapshot.clone())
    }

    async fn fetch_remote(&self, url: &str) -> Result<FetchedTree, IngestError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(FetchedTree {
            url: url.to_string(),
            files: self.snapshot.files.clone(),
            default_branch: Some("main".to_string()),
        })
    }

    async fn ingest_fetched(
        &self,
        _fetched: FetchedTree,
        _mode: ScanMode,
    ) -> Result<RepositorySnapshot, IngestError> {
        Ok(self.snapshot.clone())
    }

    async fn intake_remote(
        &self,
        _url: &str,
        _mode: ScanMode,
    ) -> Result<RepositorySnapshot, IngestError> {
        self.intake_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }
}
