//! Run summaries for the terminal

use clap::ValueEnum;
use std::fmt::Write;

use crate::run::RunResult;
use crate::stack::StackCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Formats a run for display. Json emits the whole RunResult; Text a short
/// human summary.
pub fn format_run(run: &RunResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(run).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
        OutputFormat::Text => summarize(run),
    }
}

fn summarize(run: &RunResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Run {} ({})", run.id, run.created_at.to_rfc3339());
    let _ = writeln!(out, "Repository: {}", run.snapshot.name());

    let _ = writeln!(out, "\nStages:");
    for stage in &run.stages {
        let _ = writeln!(out, "  {:<14} {:?}", stage.id.as_str(), stage.status);
    }

    let _ = writeln!(out, "\nDetected stack:");
    for category in StackCategory::ALL {
        let items = run.fingerprint.category(category);
        if items.is_empty() {
            continue;
        }
        let rendered: Vec<String> = items
            .iter()
            .map(|item| match &item.version {
                Some(version) => format!("{} {} ({:.2})", item.name, version, item.confidence),
                None => format!("{} ({:.2})", item.name, item.confidence),
            })
            .collect();
        let _ = writeln!(out, "  {:<14} {}", category.as_str(), rendered.join(", "));
    }
    if !run.fingerprint.low_confidence.is_empty() {
        let _ = writeln!(
            out,
            "  low-confidence: {}",
            run.fingerprint.low_confidence.join(", ")
        );
    }

    let _ = writeln!(
        out,
        "\nArchitecture: {} components, {} edges",
        run.architecture.components.len(),
        run.architecture.edges.len()
    );
    let _ = writeln!(out, "Intent: {}", run.intent.purpose);
    let _ = writeln!(
        out,
        "Plan: {} modules, {} build steps",
        run.plan.modules.len(),
        run.plan.build_steps.len()
    );

    out
}
