//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::output::OutputFormat;
use crate::snapshot::ScanMode;

#[derive(Debug, Parser)]
#[command(
    name = "specforge",
    about = "Turns a repository snapshot into a versioned bundle of build-ready artifacts",
    version
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet logging (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full extraction pipeline against a repository
    Analyze(AnalyzeArgs),
    /// Swap one technology in a saved run and recompile the plan
    Swap(SwapArgs),
    /// Re-render the plan text from a saved run
    Render(RenderArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Local path or remote URL of the repository
    pub source: String,

    /// Scan depth
    #[arg(long, value_enum, default_value_t = ScanModeArg::Quick)]
    pub mode: ScanModeArg,

    /// Output format for the run summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the rendered plan text to this file
    #[arg(long)]
    pub plan_out: Option<PathBuf>,

    /// Write the full run result JSON to this file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SwapArgs {
    /// Saved run result JSON (from `analyze --save`)
    pub run_file: PathBuf,

    /// Category of the swapped technology
    #[arg(long)]
    pub category: String,

    /// Technology currently in the fingerprint
    #[arg(long)]
    pub from: String,

    /// Replacement technology
    #[arg(long)]
    pub to: String,

    /// Coding agent the recompiled plan is addressed to
    #[arg(long)]
    pub agent: Option<String>,

    /// Output format for the run summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the new run result JSON to this file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Saved run result JSON
    pub run_file: PathBuf,

    /// Write the rendered plan text to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScanModeArg {
    Quick,
    Deep,
}

impl std::fmt::Display for ScanModeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanModeArg::Quick => write!(f, "quick"),
            ScanModeArg::Deep => write!(f, "deep"),
        }
    }
}

impl From<ScanModeArg> for ScanMode {
    fn from(value: ScanModeArg) -> Self {
        match value {
            ScanModeArg::Quick => ScanMode::Quick,
            ScanModeArg::Deep => ScanMode::Deep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_analyze_parsing() {
        let args = CliArgs::parse_from(["specforge", "analyze", ".", "--mode", "deep"]);
        match args.command {
            Commands::Analyze(analyze) => {
                assert_eq!(analyze.source, ".");
                assert_eq!(analyze.mode, ScanModeArg::Deep);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_swap_parsing() {
        let args = CliArgs::parse_from([
            "specforge",
            "swap",
            "run.json",
            "--category",
            "data-store",
            "--from",
            "MongoDB",
            "--to",
            "PostgreSQL",
        ]);
        match args.command {
            Commands::Swap(swap) => {
                assert_eq!(swap.category, "data-store");
                assert_eq!(swap.from, "MongoDB");
                assert_eq!(swap.to, "PostgreSQL");
            }
            _ => panic!("expected swap command"),
        }
    }
}
