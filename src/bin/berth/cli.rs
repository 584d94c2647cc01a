//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Berth - package descriptor loader and build-plan resolver
#[derive(Parser)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the package descriptor and resolve its build order
    Check(CheckArgs),

    /// Print the build plan as JSON
    Plan(PlanArgs),

    /// Display products, targets, and their dependencies
    Tree(TreeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ManifestArgs {
    /// Path to Berth.toml (defaults to searching upward from the current directory)
    #[arg(long, env = "BERTH_MANIFEST_PATH")]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Also verify that source and header directories exist on disk
    #[arg(long)]
    pub layout: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
