pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{AnalyzeArgs, CliArgs, Commands, RenderArgs, SwapArgs};
pub use output::OutputFormat;
