// src/executor.rs

//! The install pipeline
//!
//! An install is one sequential, fail-fast pass over a recipe:
//!
//! 1. **Resolve**: pick the platform rule and expand its URL template
//! 2. **Fetch**: download the artifact
//! 3. **Checksum**: compare against the rule's `sha256`, when it has one
//! 4. **Install**: unpack and place the binaries
//! 5. **Verify**: run the recipe's test step against the installed binary
//!
//! Every error is tagged with the recipe name and the step that failed.
//! Nothing is retried.

use crate::config::InstallerConfig;
use crate::error::{Result, Step, StepContext};
use crate::fetch::Fetch;
use crate::hash::verify_sha256;
use crate::install::{InstalledFile, install};
use crate::platform::Platform;
use crate::recipe::{Recipe, ResolvedSource};
use crate::verify::verify;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Per-run options
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Platform to resolve the recipe for
    pub platform: Platform,
    /// Run the recipe's test step after installing
    pub verify: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            verify: true,
        }
    }
}

/// Outcome of a successful install
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub name: String,
    pub version: String,
    /// Resolved download URL
    pub url: String,
    /// Whether the artifact was checked against a recipe checksum
    pub checksum_verified: bool,
    /// Binaries placed in the bin directory
    pub files: Vec<InstalledFile>,
    /// Output of the test step, if it ran
    pub test_output: Option<String>,
}

/// Runs recipes against a fetcher and a bin directory
pub struct Installer<F: Fetch> {
    fetcher: F,
    config: InstallerConfig,
}

impl<F: Fetch> Installer<F> {
    pub fn new(fetcher: F, config: InstallerConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    pub fn bin_dir(&self) -> &Path {
        &self.config.bin_dir
    }

    /// Resolve the download source for `platform`
    pub fn resolve(&self, recipe: &Recipe, platform: &Platform) -> Result<ResolvedSource> {
        recipe.resolve(platform).step(recipe.name(), Step::Resolve)
    }

    /// Install a recipe
    pub fn install(&self, recipe: &Recipe, options: &InstallOptions) -> Result<InstallReport> {
        let name = recipe.name();
        info!(
            "Installing {} version {} for {}",
            name,
            recipe.version(),
            options.platform
        );

        let source = self.resolve(recipe, &options.platform)?;
        info!("Resolved {} to {}", name, source.url);

        let artifact = self.fetcher.fetch(&source.url).step(name, Step::Fetch)?;

        let checksum_verified = match &source.sha256 {
            Some(expected) => {
                verify_sha256(&artifact, expected).step(name, Step::Checksum)?;
                info!("Checksum verified for {}", name);
                true
            }
            None => {
                warn!(
                    "Recipe {} has no sha256 for {}; installing unverified download",
                    name, options.platform
                );
                false
            }
        };

        let files = install(recipe, &artifact, source.filename(), self.bin_dir())
            .step(name, Step::Install)?;

        let test_output = if options.verify {
            self.run_test(recipe)?
        } else {
            None
        };

        Ok(InstallReport {
            name: name.to_string(),
            version: recipe.version().to_string(),
            url: source.url,
            checksum_verified,
            files,
            test_output,
        })
    }

    /// Run the recipe's test step against the installed binary
    ///
    /// Returns `None` when the recipe has no test step.
    pub fn run_test(&self, recipe: &Recipe) -> Result<Option<String>> {
        run_test(recipe, self.bin_dir(), self.config.verify_timeout())
    }
}

/// Run a recipe's test step against a binary already in `bin_dir`
///
/// Needs no fetcher; returns `None` when the recipe has no test step.
pub fn run_test(recipe: &Recipe, bin_dir: &Path, timeout: Duration) -> Result<Option<String>> {
    let (Some(test), Some(binary)) = (recipe.test.as_ref(), recipe.test_binary()) else {
        info!("Recipe {} has no test step", recipe.name());
        return Ok(None);
    };

    verify(&bin_dir.join(binary), &test.args, &test.expect, timeout)
        .step(recipe.name(), Step::Verify)
        .map(Some)
}
