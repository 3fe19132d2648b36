//! Repository snapshot types
//!
//! A [`RepositorySnapshot`] is the immutable input to the whole pipeline:
//! repository metadata, a capped file tree, a budgeted set of selected file
//! contents, and a language byte-share breakdown. It is produced once by an
//! ingestion collaborator and never mutated by the core.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How deep the ingestion collaborator should scan the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Small tree/file caps, fast turnaround
    Quick,
    /// Larger caps for big repositories
    Deep,
}

impl Default for ScanMode {
    fn default() -> Self {
        ScanMode::Quick
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Quick => write!(f, "quick"),
            ScanMode::Deep => write!(f, "deep"),
        }
    }
}

/// Where a repository comes from.
///
/// The orchestrator only looks at the variant to pick its stage plan; all
/// transport detail lives in the ingestion collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RepoSource {
    /// A directory on the local filesystem
    Local { path: PathBuf },
    /// A remote repository URL
    Remote { url: String },
}

impl RepoSource {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        RepoSource::Local { path: path.into() }
    }

    pub fn remote(url: impl Into<String>) -> Self {
        RepoSource::Remote { url: url.into() }
    }

    /// Short human-readable name of the repository (directory or last URL segment).
    pub fn display_name(&self) -> String {
        match self {
            RepoSource::Local { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            RepoSource::Remote { url } => url
                .trim_end_matches('/')
                .trim_end_matches(".git")
                .rsplit('/')
                .next()
                .unwrap_or(url)
                .to_string(),
        }
    }
}

/// Repository-level metadata captured at ingestion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub name: String,
    pub source: RepoSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

/// One selected file with (possibly truncated) content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSample {
    /// Repository-relative path, `/`-separated
    pub path: String,
    pub content: String,
    /// True when the content was cut at the ingestion byte budget
    #[serde(default)]
    pub truncated: bool,
}

impl FileSample {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            truncated: false,
        }
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Byte share of one language across the scanned tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: String,
    pub bytes: u64,
    /// Fraction of all counted bytes, in [0, 1]
    pub share: f32,
}

/// Immutable input to the pipeline. See module docs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    pub metadata: RepoMetadata,
    /// Capped list of repository-relative paths
    pub tree: Vec<String>,
    /// Budgeted selection of file contents
    pub files: Vec<FileSample>,
    /// Languages ranked by byte share, descending
    pub languages: Vec<LanguageShare>,
}

impl RepositorySnapshot {
    /// Looks up a selected file by exact path.
    pub fn file(&self, path: &str) -> Option<&FileSample> {
        self.files.iter().find(|f| f.path == path)
    }

    /// First README-like file, if one was selected.
    pub fn readme(&self) -> Option<&FileSample> {
        self.files
            .iter()
            .find(|f| f.file_name().to_ascii_lowercase().starts_with("readme"))
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

impl fmt::Display for RepositorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Repository: {}", self.metadata.name)?;
        writeln!(f, "Tree entries: {}", self.tree.len())?;
        writeln!(f, "Selected files: {}", self.files.len())?;
        if let Some(top) = self.languages.first() {
            writeln!(f, "Top language: {}", top.language)?;
        }
        Ok(())
    }
}
