//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Thank You Stars - star the GitHub repositories you depend on
///
/// Resolves a PyPI package and its dependencies to their GitHub
/// repositories and stars the ones you have not starred yet.
#[derive(Parser, Debug)]
#[command(name = "thank-you-stars")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Package name or project directory (pyproject.toml / setup.py)
    #[arg(default_value = ".")]
    pub target: String,

    /// GitHub personal access token (public_repo scope)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "THANK_YOU_STARS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Prompt for a GitHub token and save it to the configuration file
    #[arg(long)]
    pub setup: bool,

    /// Show star status without starring anything
    #[arg(long)]
    pub check: bool,

    /// More columns in the --check report (-v depth, -vv URL)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbosity: u8,

    /// Output format for --check
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Dependency depth to follow (0 = the package only)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub depth: i64,

    /// Also star repositories owned by you
    #[arg(long)]
    pub include_owner_repo: bool,

    /// Refetch PyPI and GitHub data instead of using the cache
    #[arg(long)]
    pub no_cache: bool,

    /// Log what would be starred without starring
    #[arg(long)]
    pub dry_run: bool,

    /// Debug logging
    #[arg(long, conflicts_with = "quiet")]
    pub debug: bool,

    /// No logs or progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Whether stdout carries machine-readable data only
    pub fn machine_output(&self) -> bool {
        self.check && self.format == OutputFormat::Json
    }
}

/// Output format for the check report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown table
    #[default]
    Table,
    /// JSON array
    Json,
}
