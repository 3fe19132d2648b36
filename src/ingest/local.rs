//! Local filesystem ingestion
//!
//! Gitignore-aware walk with scan-mode caps: a bounded file tree, a
//! budgeted selection of file contents (manifests and high-signal files
//! first), and a language byte-share ranking from file extensions.

use async_trait::async_trait;
use ignore::WalkBuilder;
use std::path::Path;
use tracing::debug;

use super::{FetchedTree, IngestError, RepositoryIngestor};
use crate::snapshot::{
    FileSample, LanguageShare, RepoMetadata, RepoSource, RepositorySnapshot, ScanMode,
};
use crate::stack::manifests;

/// Caps applied during a scan.
#[derive(Debug, Clone, Copy)]
struct ScanCaps {
    max_tree: usize,
    max_files: usize,
    max_file_bytes: usize,
}

impl ScanCaps {
    fn for_mode(mode: ScanMode) -> Self {
        match mode {
            ScanMode::Quick => Self {
                max_tree: 300,
                max_files: 30,
                max_file_bytes: 16_384,
            },
            ScanMode::Deep => Self {
                max_tree: 1_000,
                max_files: 80,
                max_file_bytes: 32_768,
            },
        }
    }
}

const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("rs", "Rust"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("py", "Python"),
    ("go", "Go"),
    ("java", "Java"),
    ("kt", "Kotlin"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("cs", "C#"),
    ("cpp", "C++"),
    ("cc", "C++"),
    ("c", "C"),
    ("swift", "Swift"),
    ("ex", "Elixir"),
    ("exs", "Elixir"),
    ("css", "CSS"),
    ("html", "HTML"),
    ("sql", "SQL"),
    ("sh", "Shell"),
];

#[derive(Debug, Default)]
pub struct LocalIngestor;

impl LocalIngestor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RepositoryIngestor for LocalIngestor {
    async fn ingest_local(
        &self,
        path: &Path,
        mode: ScanMode,
    ) -> Result<RepositorySnapshot, IngestError> {
        if !path.is_dir() {
            return Err(IngestError::PathNotFound(path.to_path_buf()));
        }
        let caps = ScanCaps::for_mode(mode);

        let mut tree = Vec::new();
        let mut language_bytes: Vec<(String, u64)> = Vec::new();
        let mut candidates: Vec<(String, u64)> = Vec::new();

        let walker = WalkBuilder::new(path)
            .hidden(true)
            .git_ignore(true)
            .build();

        for entry in walker.flatten() {
            let Ok(meta) = entry.metadata() else { continue };
            if !meta.is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(path) else {
                continue;
            };
            let rel = relative.to_string_lossy().replace('\\', "/");

            if tree.len() < caps.max_tree {
                tree.push(rel.clone());
            }

            if let Some(language) = language_for(&rel) {
                match language_bytes.iter_mut().find(|(l, _)| l == language) {
                    Some((_, bytes)) => *bytes += meta.len(),
                    None => language_bytes.push((language.to_string(), meta.len())),
                }
            }

            candidates.push((rel, meta.len()));
        }

        tree.sort();

        // Manifests and high-signal files first, then everything else small
        // enough to be worth reading.
        candidates.sort_by_key(|(rel, _)| {
            let name = rel.rsplit('/').next().unwrap_or(rel);
            let priority = if manifests::rule_for(name).is_some() {
                0
            } else if name.to_ascii_lowercase().starts_with("readme") {
                1
            } else if rel.contains("schema") || rel.contains("api") || rel.contains("config") {
                2
            } else {
                3
            };
            (priority, rel.clone())
        });

        let mut files = Vec::new();
        for (rel, size) in candidates.into_iter().take(caps.max_files) {
            let absolute = path.join(&rel);
            let Ok(raw) = std::fs::read(&absolute) else {
                continue;
            };
            // Skip binary-looking content
            if raw.iter().take(512).any(|b| *b == 0) {
                continue;
            }
            let truncated = size as usize > caps.max_file_bytes;
            let slice = &raw[..raw.len().min(caps.max_file_bytes)];
            let content = String::from_utf8_lossy(slice).into_owned();
            files.push(FileSample {
                path: rel,
                content,
                truncated,
            });
        }

        let languages = ranked_languages(language_bytes);

        let source = RepoSource::local(path);
        debug!(
            "ingested {}: {} tree entries, {} files selected",
            source.display_name(),
            tree.len(),
            files.len()
        );

        Ok(RepositorySnapshot {
            metadata: RepoMetadata {
                name: source.display_name(),
                source,
                description: None,
                default_branch: None,
            },
            tree,
            files,
            languages,
        })
    }

    /// Assembles a snapshot from an already-fetched content bundle. Shares
    /// the caps and ranking logic with the local path.
    async fn ingest_fetched(
        &self,
        fetched: FetchedTree,
        mode: ScanMode,
    ) -> Result<RepositorySnapshot, IngestError> {
        let caps = ScanCaps::for_mode(mode);
        let source = RepoSource::remote(fetched.url.clone());

        let mut tree: Vec<String> = fetched.files.iter().map(|f| f.path.clone()).collect();
        tree.sort();
        tree.truncate(caps.max_tree);

        let mut language_bytes: Vec<(String, u64)> = Vec::new();
        for file in &fetched.files {
            if let Some(language) = language_for(&file.path) {
                let bytes = file.content.len() as u64;
                match language_bytes.iter_mut().find(|(l, _)| l == language) {
                    Some((_, total)) => *total += bytes,
                    None => language_bytes.push((language.to_string(), bytes)),
                }
            }
        }

        let mut files = fetched.files;
        files.sort_by_key(|f| {
            let priority = if manifests::rule_for(f.file_name()).is_some() {
                0
            } else if f.file_name().to_ascii_lowercase().starts_with("readme") {
                1
            } else {
                2
            };
            (priority, f.path.clone())
        });
        files.truncate(caps.max_files);
        for file in &mut files {
            if file.content.len() > caps.max_file_bytes {
                file.content.truncate(caps.max_file_bytes);
                file.truncated = true;
            }
        }

        Ok(RepositorySnapshot {
            metadata: RepoMetadata {
                name: source.display_name(),
                source,
                description: None,
                default_branch: fetched.default_branch,
            },
            tree,
            files,
            languages: ranked_languages(language_bytes),
        })
    }
}

fn language_for(path: &str) -> Option<&'static str> {
    let extension = path.rsplit('.').next()?;
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, language)| *language)
}

fn ranked_languages(language_bytes: Vec<(String, u64)>) -> Vec<LanguageShare> {
    let total: u64 = language_bytes.iter().map(|(_, b)| *b).sum();
    if total == 0 {
        return Vec::new();
    }
    let mut languages: Vec<LanguageShare> = language_bytes
        .into_iter()
        .map(|(language, bytes)| LanguageShare {
            language,
            bytes,
            share: bytes as f32 / total as f32,
        })
        .collect();
    languages.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    languages
}
