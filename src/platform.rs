// src/platform.rs

//! Platform detection and platform-rule predicates
//!
//! A [`Platform`] is the operating system and CPU architecture of the
//! machine an install runs for. Recipes condition their download URLs on
//! [`PlatformPredicate`]s, which match a platform by OS and/or architecture.
//!
//! Names are normalized so that recipes can use the spellings common in
//! release artifact names:
//!
//! | Canonical | Accepted aliases          |
//! |-----------|---------------------------|
//! | `macos`   | `darwin`, `osx`, `apple`  |
//! | `linux`   |                           |
//! | `windows` | `win`, `win32`            |
//! | `x86_64`  | `amd64`, `x64`            |
//! | `aarch64` | `arm64`                   |
//!
//! The architecture `universal` matches every macOS architecture, mirroring
//! universal (fat) Apple binaries.

use std::fmt;

/// Operating system and architecture of an install target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    /// Create a platform, normalizing OS and architecture names
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: normalize_os(os),
            arch: normalize_arch(arch),
        }
    }

    /// The platform this process is running on
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Current platform with optional overrides for either component
    pub fn with_overrides(os: Option<&str>, arch: Option<&str>) -> Self {
        let current = Self::current();
        Self {
            os: os.map(normalize_os).unwrap_or(current.os),
            arch: arch.map(normalize_arch).unwrap_or(current.arch),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Predicate half of a platform rule
///
/// A missing component matches anything, so an empty predicate is a
/// catch-all rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformPredicate {
    pub os: Option<String>,
    pub arch: Option<String>,
}

impl PlatformPredicate {
    pub fn matches(&self, platform: &Platform) -> bool {
        let os_ok = self
            .os
            .as_deref()
            .is_none_or(|os| normalize_os(os) == platform.os);

        let arch_ok = self.arch.as_deref().is_none_or(|arch| {
            let arch = normalize_arch(arch);
            arch == platform.arch || (arch == "universal" && platform.os == "macos")
        });

        os_ok && arch_ok
    }

    /// Normalized form, used to detect duplicate rules
    pub fn normalized(&self) -> (Option<String>, Option<String>) {
        (
            self.os.as_deref().map(normalize_os),
            self.arch.as_deref().map(normalize_arch),
        )
    }
}

impl fmt::Display for PlatformPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.os.as_deref().unwrap_or("*"),
            self.arch.as_deref().unwrap_or("*")
        )
    }
}

fn normalize_os(os: &str) -> String {
    match os.to_lowercase().as_str() {
        "darwin" | "osx" | "apple" | "macos" => "macos".to_string(),
        "win" | "win32" | "windows" => "windows".to_string(),
        other => other.to_string(),
    }
}

fn normalize_arch(arch: &str) -> String {
    match arch.to_lowercase().as_str() {
        "amd64" | "x64" | "x86_64" => "x86_64".to_string(),
        "arm64" | "aarch64" => "aarch64".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pred(os: Option<&str>, arch: Option<&str>) -> PlatformPredicate {
        PlatformPredicate {
            os: os.map(String::from),
            arch: arch.map(String::from),
        }
    }

    #[test]
    fn test_aliases_normalize() {
        assert_eq!(Platform::new("Darwin", "arm64"), Platform::new("macos", "aarch64"));
        assert_eq!(Platform::new("linux", "amd64").arch, "x86_64");
    }

    #[test]
    fn test_empty_predicate_matches_everything() {
        assert!(pred(None, None).matches(&Platform::new("linux", "x86_64")));
        assert!(pred(None, None).matches(&Platform::new("freebsd", "riscv64")));
    }

    #[test]
    fn test_os_only_predicate() {
        let p = pred(Some("macos"), None);
        assert!(p.matches(&Platform::new("macos", "x86_64")));
        assert!(p.matches(&Platform::new("darwin", "aarch64")));
        assert!(!p.matches(&Platform::new("linux", "x86_64")));
    }

    #[test]
    fn test_universal_arch_matches_any_mac() {
        let p = pred(Some("macos"), Some("universal"));
        assert!(p.matches(&Platform::new("macos", "x86_64")));
        assert!(p.matches(&Platform::new("macos", "aarch64")));
        assert!(!pred(None, Some("universal")).matches(&Platform::new("linux", "x86_64")));
    }

    #[test]
    fn test_overrides() {
        let p = Platform::with_overrides(Some("darwin"), Some("arm64"));
        assert_eq!(p.to_string(), "macos/aarch64");
    }
}
