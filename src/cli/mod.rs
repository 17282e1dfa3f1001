// src/cli/mod.rs
//! CLI definitions for tapster
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tapster")]
#[command(author = "Tapster Contributors")]
#[command(version)]
#[command(about = "Install prebuilt binary releases from declarative recipes", long_about = None)]
pub struct Cli {
    /// Configuration file (default: <config dir>/tapster/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Platform overrides shared by commands that resolve a recipe
#[derive(Args, Debug, Clone, Default)]
pub struct PlatformArgs {
    /// Resolve for this operating system instead of the running one
    #[arg(long)]
    pub os: Option<String>,

    /// Resolve for this architecture instead of the running one
    #[arg(long)]
    pub arch: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and install the binaries a recipe describes
    Install {
        /// Path to the recipe file
        recipe: String,

        /// Directory to install binaries into
        #[arg(short, long)]
        bin_dir: Option<String>,

        /// Skip the recipe's test step
        #[arg(long)]
        no_verify: bool,

        #[command(flatten)]
        platform: PlatformArgs,
    },

    /// Print the download URL a recipe resolves to
    Resolve {
        /// Path to the recipe file
        recipe: String,

        #[command(flatten)]
        platform: PlatformArgs,
    },

    /// Run a recipe's test step against the installed binary
    Test {
        /// Path to the recipe file
        recipe: String,

        /// Directory the binaries were installed into
        #[arg(short, long)]
        bin_dir: Option<String>,
    },

    /// Parse and validate a recipe
    Validate {
        /// Path to the recipe file
        recipe: String,
    },

    /// Show recipe metadata and platform rules
    Info {
        /// Path to the recipe file
        recipe: String,
    },
}
