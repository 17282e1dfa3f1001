// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::recipe::format::Recipe;
use std::collections::HashSet;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::IoError(format!(
            "Failed to read recipe file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Hard problems are returned as errors; soft ones as warnings.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    // Check for empty name/version
    if recipe.package.name.trim().is_empty() {
        return Err(Error::ParseError("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.trim().is_empty() {
        return Err(Error::ParseError("Recipe package version cannot be empty".to_string()));
    }

    if recipe.platforms.is_empty() {
        return Err(Error::ParseError(format!(
            "Recipe {} has no platform rules",
            recipe.package.name
        )));
    }

    if recipe.install.bin.is_empty() {
        return Err(Error::ParseError(format!(
            "Recipe {} installs nothing: [install] bin is empty",
            recipe.package.name
        )));
    }

    recipe.install.check_entries()?;

    if !recipe.package.homepage.is_empty() {
        if let Err(e) = url::Url::parse(&recipe.package.homepage) {
            return Err(Error::ParseError(format!(
                "Invalid homepage URL {}: {}",
                recipe.package.homepage, e
            )));
        }
    } else {
        warnings.push("Missing package homepage".to_string());
    }

    if recipe.package.description.is_empty() {
        warnings.push("Missing package description".to_string());
    }

    if semver::Version::parse(&recipe.package.version).is_err() {
        warnings.push(format!(
            "Version {} is not a semantic version",
            recipe.package.version
        ));
    }

    // Templates must expand for any platform; placeholders do not depend on
    // which platform is chosen, so a fixed one is enough to check them.
    let probe = Platform::new("linux", "x86_64");
    let mut seen = HashSet::new();
    for (i, rule) in recipe.platforms.iter().enumerate() {
        let url = recipe.substitute(&rule.url, &probe)?;
        url::Url::parse(&url)
            .map_err(|e| Error::ParseError(format!("Invalid URL in platform rule {}: {}", i, e)))?;

        match &rule.sha256 {
            Some(sum) => {
                if sum.len() != 64 || !sum.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(Error::ParseError(format!(
                        "Invalid sha256 in platform rule {}: {}",
                        i, sum
                    )));
                }
            }
            None => warnings.push(format!(
                "Platform rule {} ({}) has no sha256; download integrity will not be verified",
                i,
                rule.predicate()
            )),
        }

        if !seen.insert(rule.predicate().normalized()) {
            warnings.push(format!(
                "Platform rule {} ({}) is shadowed by an earlier rule with the same predicate",
                i,
                rule.predicate()
            ));
        }
    }

    if let Some(test) = &recipe.test {
        if test.expect.is_empty() {
            warnings.push("Test expects an empty string; it will always pass".to_string());
        }
    } else {
        warnings.push("No [test] section; installs will not be verified".to_string());
    }

    Ok(warnings)
}
