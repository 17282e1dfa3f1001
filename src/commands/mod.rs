// src/commands/mod.rs
//! Command handlers for the tapster CLI

mod info;
mod install;
mod resolve;
mod validate;
mod verify;

pub use info::cmd_info;
pub use install::cmd_install;
pub use resolve::cmd_resolve;
pub use validate::cmd_validate;
pub use verify::cmd_test;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tapster::config::InstallerConfig;
use tapster::recipe::{Recipe, parse_recipe_file, validate_recipe};

/// Load a recipe and reject it if validation fails
///
/// Validation warnings are logged, not printed; `validate` prints them.
fn load_recipe(path: &str) -> Result<Recipe> {
    let path = Path::new(path);
    let recipe = parse_recipe_file(path)
        .with_context(|| format!("Failed to load recipe: {}", path.display()))?;

    let warnings = validate_recipe(&recipe)
        .with_context(|| format!("Recipe validation failed: {}", path.display()))?;
    for warning in &warnings {
        tracing::warn!("{}: {}", recipe.name(), warning);
    }

    Ok(recipe)
}

/// Load configuration and apply a command-line bin directory override
fn load_config(config_path: Option<&str>, bin_dir: Option<&str>) -> Result<InstallerConfig> {
    let mut config = InstallerConfig::load(config_path.map(Path::new))
        .context("Failed to load configuration")?;

    if let Some(dir) = bin_dir {
        config.bin_dir = PathBuf::from(dir);
    }

    Ok(config)
}
