// src/commands/verify.rs
//! Test command - run a recipe's test step against installed binaries

use super::{load_config, load_recipe};
use anyhow::Result;
use tapster::executor::run_test;

/// Run the test step of an installed recipe
pub fn cmd_test(recipe_path: &str, config_path: Option<&str>, bin_dir: Option<&str>) -> Result<()> {
    let recipe = load_recipe(recipe_path)?;
    let config = load_config(config_path, bin_dir)?;

    match run_test(&recipe, &config.bin_dir, config.verify_timeout())? {
        Some(output) => println!("[OK] {}: {}", recipe.name(), output.trim()),
        None => println!("{} has no test step", recipe.name()),
    }

    Ok(())
}
