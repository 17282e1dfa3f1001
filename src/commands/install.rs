// src/commands/install.rs
//! Install command - fetch and install a recipe's binaries

use super::{load_config, load_recipe};
use crate::cli::PlatformArgs;
use anyhow::Result;
use std::io::IsTerminal;
use tapster::executor::{InstallOptions, Installer};
use tapster::fetch::ReleaseFetcher;
use tapster::platform::Platform;
use tracing::info;

/// Install a recipe
///
/// # Arguments
/// * `recipe_path` - Path to the recipe file
/// * `config_path` - Optional configuration file
/// * `bin_dir` - Overrides the configured bin directory
/// * `no_verify` - Skip the recipe's test step
/// * `platform` - Optional OS/architecture overrides
/// * `quiet` - Suppress the download progress bar
pub fn cmd_install(
    recipe_path: &str,
    config_path: Option<&str>,
    bin_dir: Option<&str>,
    no_verify: bool,
    platform: &PlatformArgs,
    quiet: bool,
) -> Result<()> {
    let recipe = load_recipe(recipe_path)?;
    let config = load_config(config_path, bin_dir)?;

    let fetcher = ReleaseFetcher::with_timeout(config.http_timeout(), config.user_agent.as_deref())?
        .with_progress(!quiet && std::io::stderr().is_terminal());

    let options = InstallOptions {
        platform: Platform::with_overrides(platform.os.as_deref(), platform.arch.as_deref()),
        verify: !no_verify,
    };

    println!(
        "Installing {} {} into {}",
        recipe.name(),
        recipe.version(),
        config.bin_dir.display()
    );

    let installer = Installer::new(fetcher, config);
    let report = installer.install(&recipe, &options)?;

    if !report.checksum_verified {
        println!("[WARNING] No checksum in recipe; download integrity was not verified");
    }

    for file in &report.files {
        println!("  {} (sha256 {})", file.path.display(), file.sha256);
    }

    match &report.test_output {
        Some(output) => println!("[OK] Test passed: {}", output.trim()),
        None if no_verify => println!("Test step skipped"),
        None => {}
    }

    println!("\n[COMPLETE] Installed {} {}", report.name, report.version);
    info!("Installed {} from {}", report.name, report.url);

    Ok(())
}
