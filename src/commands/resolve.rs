// src/commands/resolve.rs
//! Resolve command - print the download URL for a platform

use super::load_recipe;
use crate::cli::PlatformArgs;
use anyhow::Result;
use tapster::platform::Platform;

/// Print the URL a recipe resolves to
///
/// Performs no network I/O.
pub fn cmd_resolve(recipe_path: &str, platform: &PlatformArgs) -> Result<()> {
    let recipe = load_recipe(recipe_path)?;
    let platform = Platform::with_overrides(platform.os.as_deref(), platform.arch.as_deref());

    let source = recipe.resolve(&platform)?;

    println!("{}", source.url);
    match &source.sha256 {
        Some(sum) => println!("sha256 {}", sum),
        None => println!("sha256 (none)"),
    }

    Ok(())
}
