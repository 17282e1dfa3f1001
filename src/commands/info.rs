// src/commands/info.rs
//! Info command - show recipe metadata

use super::load_recipe;
use anyhow::Result;
use tapster::platform::Platform;

pub fn cmd_info(recipe_path: &str) -> Result<()> {
    let recipe = load_recipe(recipe_path)?;
    let current = Platform::current();

    println!("{} {}", recipe.name(), recipe.version());
    if !recipe.package.description.is_empty() {
        println!("  {}", recipe.package.description);
    }
    if !recipe.package.homepage.is_empty() {
        println!("  Homepage: {}", recipe.package.homepage);
    }

    println!("\nPlatform rules:");
    let selected = recipe.matching_rule(&current).map(|(i, _)| i);
    for (i, rule) in recipe.platforms.iter().enumerate() {
        let marker = if Some(i) == selected { "*" } else { " " };
        let checksum = if rule.sha256.is_some() { "sha256" } else { "no checksum" };
        println!("{} {:<20} {} ({})", marker, rule.predicate().to_string(), rule.url, checksum);
    }
    if selected.is_none() {
        println!("  (no rule matches this platform: {})", current);
    }

    println!("\nBinaries:");
    for entry in &recipe.install.bin {
        println!("  {}", entry.installed_name());
    }

    if let Some(test) = &recipe.test {
        println!(
            "\nTest: {} {} (expects {:?})",
            recipe.test_binary().unwrap_or_default(),
            test.args.join(" "),
            test.expect
        );
    }

    Ok(())
}
