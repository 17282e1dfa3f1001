// src/lib.rs

//! Tapster
//!
//! Installs prebuilt binary releases described by declarative recipes.
//!
//! # Architecture
//!
//! - Recipes: static TOML describing name, version, platform-conditioned
//!   download URLs, binaries to install and a smoke test
//! - Single pass: resolve, fetch, checksum, install, verify; fail fast,
//!   never retry
//! - Atomic placement: binaries are staged next to the bin directory and
//!   renamed into place, so reinstalling is idempotent

pub mod archive;
pub mod config;
mod error;
pub mod executor;
pub mod fetch;
pub mod hash;
pub mod install;
pub mod platform;
pub mod recipe;
pub mod verify;

pub use config::InstallerConfig;
pub use error::{Error, Result, Step, StepContext, StepError};
pub use executor::{InstallOptions, InstallReport, Installer};
pub use fetch::{Fetch, ReleaseFetcher};
pub use platform::{Platform, PlatformPredicate};
pub use recipe::{Recipe, ResolvedSource, parse_recipe, parse_recipe_file, validate_recipe};
