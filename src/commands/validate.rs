// src/commands/validate.rs
//! Validate command - check a recipe without installing it

use anyhow::{Context, Result};
use std::path::Path;
use tapster::recipe::{parse_recipe_file, validate_recipe};

pub fn cmd_validate(recipe_path: &str) -> Result<()> {
    let path = Path::new(recipe_path);

    println!("Reading recipe: {}", path.display());
    let recipe = parse_recipe_file(path)
        .with_context(|| format!("Failed to parse recipe: {}", path.display()))?;

    println!("Recipe: {} version {}", recipe.name(), recipe.version());

    let warnings = validate_recipe(&recipe).with_context(|| "Recipe validation failed")?;

    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    println!("Recipe validation passed");
    if warnings.is_empty() {
        println!("[OK] No issues found");
    } else {
        println!("[OK] {} warning(s)", warnings.len());
    }

    Ok(())
}
