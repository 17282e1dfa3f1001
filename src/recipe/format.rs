// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe where a prebuilt release lives for
//! each platform, which files to install from it, and how to smoke test the
//! result.

use crate::error::{Error, Result};
use crate::platform::{Platform, PlatformPredicate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A complete recipe for installing one versioned release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Platform rules, evaluated top to bottom
    #[serde(rename = "platform", default)]
    pub platforms: Vec<PlatformRule>,

    /// Files to place into the bin directory
    pub install: InstallSection,

    /// Post-install smoke test (optional)
    #[serde(default)]
    pub test: Option<TestSection>,
}

/// A download URL resolved for one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Fully substituted download URL
    pub url: String,
    /// Expected SHA-256 of the artifact, if the rule declares one
    pub sha256: Option<String>,
    /// Index of the rule that matched
    pub rule_index: usize,
}

impl ResolvedSource {
    /// Last path segment of the URL
    pub fn filename(&self) -> &str {
        let path = self.url.split(['?', '#']).next().unwrap_or(&self.url);
        path.rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or("download")
    }
}

impl Recipe {
    pub fn name(&self) -> &str {
        &self.package.name
    }

    pub fn version(&self) -> &str {
        &self.package.version
    }

    /// Select the first platform rule matching `platform`
    pub fn matching_rule(&self, platform: &Platform) -> Option<(usize, &PlatformRule)> {
        self.platforms
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.predicate().matches(platform))
    }

    /// Resolve the download URL for `platform`
    ///
    /// Fails with [`Error::UnsupportedPlatform`] when no rule matches.
    pub fn resolve(&self, platform: &Platform) -> Result<ResolvedSource> {
        let (rule_index, rule) =
            self.matching_rule(platform).ok_or_else(|| Error::UnsupportedPlatform {
                os: platform.os.clone(),
                arch: platform.arch.clone(),
            })?;

        let url = self.substitute(&rule.url, platform)?;

        Ok(ResolvedSource {
            url,
            sha256: rule.sha256.clone(),
            rule_index,
        })
    }

    /// Substitute recipe variables in a template
    ///
    /// Known placeholders: `version`, `name`, `os`, `arch`, written either
    /// as `#{name}` or `{name}`.
    pub fn substitute(&self, template: &str, platform: &Platform) -> Result<String> {
        substitute(template, &[
            ("version", self.package.version.as_str()),
            ("name", self.package.name.as_str()),
            ("os", platform.os.as_str()),
            ("arch", platform.arch.as_str()),
        ])
    }

    /// Name of the binary the test step runs
    pub fn test_binary(&self) -> Option<String> {
        let test = self.test.as_ref()?;
        test.binary
            .clone()
            .or_else(|| self.install.bin.first().map(|b| b.installed_name()))
    }
}

/// Expand `#{key}` / `{key}` placeholders from `vars`
///
/// Unknown keys and unterminated braces are parse errors.
pub fn substitute(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let (before, after) = rest.split_at(open);
        out.push_str(before.strip_suffix('#').unwrap_or(before));

        let close = after.find('}').ok_or_else(|| {
            Error::ParseError(format!("Unterminated placeholder in template: {}", template))
        })?;
        let key = &after[1..close];

        let value = vars
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| {
                Error::ParseError(format!(
                    "Unknown placeholder '{{{}}}' in template: {}",
                    key, template
                ))
            })?;
        out.push_str(value);

        rest = &after[close + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Homepage URL
    #[serde(default)]
    pub homepage: String,

    /// Release version
    pub version: String,
}

/// One platform-conditioned download location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRule {
    /// Operating system this rule applies to (any if absent)
    #[serde(default)]
    pub os: Option<String>,

    /// Architecture this rule applies to (any if absent)
    #[serde(default)]
    pub arch: Option<String>,

    /// Download URL template
    pub url: String,

    /// Hex SHA-256 of the artifact
    #[serde(default)]
    pub sha256: Option<String>,
}

impl PlatformRule {
    pub fn predicate(&self) -> PlatformPredicate {
        PlatformPredicate {
            os: self.os.clone(),
            arch: self.arch.clone(),
        }
    }
}

/// Install instructions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallSection {
    /// Binaries to place into the bin directory
    #[serde(default)]
    pub bin: Vec<BinEntry>,
}

impl InstallSection {
    /// Check that every entry stays inside the archive and the bin directory
    ///
    /// Installed names must be plain file names and unique; sources must be
    /// relative paths without `..` components.
    pub fn check_entries(&self) -> Result<()> {
        let mut names = HashSet::new();

        for entry in &self.bin {
            let name = entry.installed_name();
            if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
                return Err(Error::ParseError(format!(
                    "Invalid installed binary name: {:?}",
                    name
                )));
            }

            let source = entry.source();
            if source.starts_with('/') || source.split(['/', '\\']).any(|c| c == "..") {
                return Err(Error::ParseError(format!(
                    "Binary source must be a relative path inside the archive: {}",
                    source
                )));
            }

            if !names.insert(name.clone()) {
                return Err(Error::ParseError(format!(
                    "Binary {} is installed more than once",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// A binary to install
///
/// Either a bare path inside the archive, or a table that renames it:
///
/// ```toml
/// bin = ["skyscraper", { source = "dist/sky", name = "sky" }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BinEntry {
    Path(String),
    Renamed { source: String, name: String },
}

impl BinEntry {
    /// Path of the file inside the extracted archive
    pub fn source(&self) -> &str {
        match self {
            Self::Path(path) => path,
            Self::Renamed { source, .. } => source,
        }
    }

    /// File name in the bin directory
    pub fn installed_name(&self) -> String {
        match self {
            Self::Path(path) => path
                .rsplit('/')
                .find(|s| !s.is_empty())
                .unwrap_or(path)
                .to_string(),
            Self::Renamed { name, .. } => name.clone(),
        }
    }
}

/// Post-install smoke test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSection {
    /// Installed binary to run (defaults to the first `install.bin` entry)
    #[serde(default)]
    pub binary: Option<String>,

    /// Arguments passed to the binary
    #[serde(default = "default_test_args")]
    pub args: Vec<String>,

    /// Substring the combined output must contain
    pub expect: String,
}

fn default_test_args() -> Vec<String> {
    vec!["--version".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skyscraper() -> Recipe {
        Recipe {
            package: PackageSection {
                name: "skyscraper".to_string(),
                description: "A TUI client for Bluesky".to_string(),
                homepage: "https://github.com/cameronbanga/skyscraper-cli".to_string(),
                version: "0.1.0".to_string(),
            },
            platforms: vec![PlatformRule {
                os: Some("macos".to_string()),
                arch: None,
                url: "https://github.com/cameronbanga/skyscraper-cli/releases/download/v#{version}/skyscraper-#{version}-universal-apple-darwin.tar.gz".to_string(),
                sha256: None,
            }],
            install: InstallSection {
                bin: vec![BinEntry::Path("skyscraper".to_string())],
            },
            test: Some(TestSection {
                binary: None,
                args: default_test_args(),
                expect: "skyscraper".to_string(),
            }),
        }
    }

    #[test]
    fn test_resolve_substitutes_version() {
        let recipe = skyscraper();
        let resolved = recipe.resolve(&Platform::new("macos", "aarch64")).unwrap();
        assert_eq!(
            resolved.url,
            "https://github.com/cameronbanga/skyscraper-cli/releases/download/v0.1.0/skyscraper-0.1.0-universal-apple-darwin.tar.gz"
        );
        assert_eq!(resolved.filename(), "skyscraper-0.1.0-universal-apple-darwin.tar.gz");
        assert_eq!(resolved.rule_index, 0);
    }

    #[test]
    fn test_resolve_unsupported_platform() {
        let recipe = skyscraper();
        let err = recipe.resolve(&Platform::new("linux", "x86_64")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedPlatform { ref os, .. } if os == "linux"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let mut recipe = skyscraper();
        recipe.platforms.push(PlatformRule {
            os: None,
            arch: None,
            url: "https://example.com/{name}-{version}-{os}-{arch}.tar.gz".to_string(),
            sha256: Some("00".repeat(32)),
        });

        let mac = recipe.resolve(&Platform::new("macos", "x86_64")).unwrap();
        assert_eq!(mac.rule_index, 0);

        let linux = recipe.resolve(&Platform::new("linux", "amd64")).unwrap();
        assert_eq!(linux.rule_index, 1);
        assert_eq!(linux.url, "https://example.com/skyscraper-0.1.0-linux-x86_64.tar.gz");
        assert!(linux.sha256.is_some());
    }

    #[test]
    fn test_substitute_both_styles() {
        let vars = [("version", "1.2.3")];
        assert_eq!(substitute("v#{version}/{version}", &vars).unwrap(), "v1.2.3/1.2.3");
        assert_eq!(substitute("no placeholders", &vars).unwrap(), "no placeholders");
    }

    #[test]
    fn test_substitute_unknown_placeholder() {
        assert!(substitute("{nope}", &[("version", "1")]).is_err());
        assert!(substitute("v#{version", &[("version", "1")]).is_err());
    }

    #[test]
    fn test_bin_entry_names() {
        assert_eq!(BinEntry::Path("bin/tool".into()).installed_name(), "tool");
        let renamed = BinEntry::Renamed {
            source: "dist/sky".into(),
            name: "sky".into(),
        };
        assert_eq!(renamed.source(), "dist/sky");
        assert_eq!(renamed.installed_name(), "sky");
    }

    #[test]
    fn test_check_entries() {
        let ok = InstallSection {
            bin: vec![
                BinEntry::Path("bin/tool".into()),
                BinEntry::Renamed {
                    source: "dist/tool".into(),
                    name: "tool2".into(),
                },
            ],
        };
        assert!(ok.check_entries().is_ok());

        for bad in [
            BinEntry::Renamed {
                source: "tool".into(),
                name: "../escaped".into(),
            },
            BinEntry::Renamed {
                source: "tool".into(),
                name: "..".into(),
            },
            BinEntry::Path("../tool".into()),
            BinEntry::Path("/usr/bin/tool".into()),
        ] {
            let section = InstallSection { bin: vec![bad] };
            assert!(matches!(section.check_entries(), Err(Error::ParseError(_))));
        }
    }

    #[test]
    fn test_check_entries_rejects_duplicate_names() {
        let section = InstallSection {
            bin: vec![
                BinEntry::Path("a/tool".into()),
                BinEntry::Renamed {
                    source: "b/other".into(),
                    name: "tool".into(),
                },
            ],
        };
        let err = section.check_entries().unwrap_err();
        assert!(matches!(err, Error::ParseError(ref m) if m.contains("more than once")));
    }

    #[test]
    fn test_test_binary_defaults_to_first_bin() {
        let recipe = skyscraper();
        assert_eq!(recipe.test_binary().as_deref(), Some("skyscraper"));
    }
}
