// src/recipe/mod.rs

//! Recipe system for installing prebuilt releases
//!
//! Recipes define how to obtain and install one versioned release:
//! - Package metadata (name, description, homepage, version)
//! - Platform rules mapping OS/architecture to a download URL template
//! - Binaries to place into the bin directory
//! - A smoke test run against the installed binary
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "skyscraper"
//! description = "A TUI client for Bluesky"
//! homepage = "https://github.com/cameronbanga/skyscraper-cli"
//! version = "0.1.0"
//!
//! [[platform]]
//! os = "macos"
//! url = "https://github.com/cameronbanga/skyscraper-cli/releases/download/v#{version}/skyscraper-#{version}-universal-apple-darwin.tar.gz"
//!
//! [install]
//! bin = ["skyscraper"]
//!
//! [test]
//! args = ["--version"]
//! expect = "skyscraper"
//! ```
//!
//! # Integrity
//!
//! Platform rules may carry a `sha256`. When present it is enforced; when
//! absent the download is installed unverified and a warning is emitted.

mod format;
pub mod parser;

pub use format::{
    BinEntry, InstallSection, PackageSection, PlatformRule, Recipe, ResolvedSource, TestSection,
    substitute,
};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
