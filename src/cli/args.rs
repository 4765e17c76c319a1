//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Retort - configuration-driven test environment matrix runner.
#[derive(Debug, Parser)]
#[command(name = "retort")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default retort.ini)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides discovery from current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run environments (default if no command specified)
    Run(RunArgs),

    /// List configured environments
    List(ListArgs),

    /// Show the resolved plan for one environment
    Show(ShowArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Environments to run (comma-separated); defaults to the envlist
    #[arg(short = 'e', long = "env", value_delimiter = ',')]
    pub envs: Vec<String>,

    /// Resolve and print commands without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Extra arguments forwarded into {posargs} (after --)
    #[arg(last = true)]
    pub posargs: Vec<String>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ShowArgs {
    /// Environment (or auxiliary section) to resolve
    #[arg(short = 'e', long = "env")]
    pub env: String,

    /// Resolve an auxiliary tool section instead of an environment
    #[arg(long)]
    pub checker: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Extra arguments forwarded into {posargs} (after --)
    #[arg(last = true)]
    pub posargs: Vec<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
