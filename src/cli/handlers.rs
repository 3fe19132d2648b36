//! Command handlers
//!
//! Thin I/O wrappers: wire up the collaborators, invoke the core, print or
//! write the result. No decision logic lives here.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::error;

use super::commands::{AnalyzeArgs, RenderArgs, SwapArgs};
use super::output::format_run;
use crate::config::ForgeConfig;
use crate::ingest::LocalIngestor;
use crate::pipeline::Orchestrator;
use crate::plan::render;
use crate::run::RunResult;
use crate::snapshot::RepoSource;
use crate::store::{MemoryRunStore, RunStore};
use crate::swap::{SwapEngine, SwapRequest};

pub async fn handle_analyze(args: &AnalyzeArgs) -> i32 {
    let config = match ForgeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {}", e);
            return 2;
        }
    };

    let source = parse_source(&args.source);
    let store: Arc<dyn RunStore> = Arc::new(MemoryRunStore::new());
    let orchestrator = Orchestrator::new(
        Arc::new(LocalIngestor::new()),
        config.create_client(),
        store,
    )
    .with_max_retries(config.max_retries)
    .with_budget(config.prompt_budget());

    let run = match orchestrator.run(source, args.mode.into()).await {
        Ok(run) => run,
        Err(e) => {
            error!("run failed: {:#}", e);
            return 1;
        }
    };

    if let Some(path) = &args.plan_out {
        if let Err(code) = write_file(path, &run.plan_text) {
            return code;
        }
    }
    if let Some(path) = &args.save {
        if let Err(code) = save_run(path, &run) {
            return code;
        }
    }

    println!("{}", format_run(&run, args.format));
    0
}

pub async fn handle_swap(args: &SwapArgs) -> i32 {
    let config = match ForgeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {}", e);
            return 2;
        }
    };

    let category = match args.category.parse() {
        Ok(category) => category,
        Err(e) => {
            error!("{}", e);
            return 2;
        }
    };

    let prior = match load_run(&args.run_file) {
        Ok(run) => run,
        Err(code) => return code,
    };
    let prior_id = prior.id.clone();

    let store: Arc<dyn RunStore> = Arc::new(MemoryRunStore::new());
    store.put(prior);

    let engine = SwapEngine::new(store, config.create_client())
        .with_max_retries(config.max_retries);
    let request = SwapRequest {
        category,
        current: args.from.clone(),
        replacement: args.to.clone(),
        target_agent: args.agent.clone(),
    };

    let run = match engine.swap(&prior_id, &request).await {
        Ok(run) => run,
        Err(e) => {
            error!("swap failed: {}", e);
            return 1;
        }
    };

    if let Some(path) = &args.save {
        if let Err(code) = save_run(path, &run) {
            return code;
        }
    }

    println!("{}", format_run(&run, args.format));
    0
}

pub async fn handle_render(args: &RenderArgs) -> i32 {
    let run = match load_run(&args.run_file) {
        Ok(run) => run,
        Err(code) => return code,
    };

    let text = render(&run.plan);
    match &args.out {
        Some(path) => {
            if let Err(code) = write_file(path, &text) {
                return code;
            }
        }
        None => println!("{}", text),
    }
    0
}

fn parse_source(raw: &str) -> RepoSource {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        RepoSource::remote(raw)
    } else {
        RepoSource::local(raw)
    }
}

fn load_run(path: &Path) -> Result<RunResult, i32> {
    let raw = fs::read_to_string(path).map_err(|e| {
        error!("failed to read {}: {}", path.display(), e);
        2
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        error!("failed to parse {}: {}", path.display(), e);
        2
    })
}

fn save_run(path: &Path, run: &RunResult) -> Result<(), i32> {
    let json = serde_json::to_string_pretty(run).map_err(|e| {
        error!("failed to serialize run: {}", e);
        1
    })?;
    write_file(path, &json)
}

fn write_file(path: &Path, content: &str) -> Result<(), i32> {
    fs::write(path, content).map_err(|e| {
        error!("failed to write {}: {}", path.display(), e);
        1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert!(matches!(
            parse_source("https://github.com/acme/widget"),
            RepoSource::Remote { .. }
        ));
        assert!(matches!(parse_source("./repo"), RepoSource::Local { .. }));
    }
}
