// src/config.rs

//! Installer configuration
//!
//! Configuration is optional. Defaults come from the platform's standard
//! directories; a TOML file can override them, and command-line flags
//! override the file.
//!
//! ```toml
//! bin_dir = "/opt/tools/bin"
//! http_timeout_secs = 60
//! verify_timeout_secs = 10
//! user_agent = "my-mirror-client/1.0"
//! ```

use crate::error::{Error, Result};
use crate::fetch::HTTP_TIMEOUT;
use crate::verify::VERIFY_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Installer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Directory binaries are installed into
    pub bin_dir: PathBuf,

    /// Timeout for each HTTP request
    pub http_timeout_secs: u64,

    /// Timeout for the recipe's test command
    pub verify_timeout_secs: u64,

    /// User-Agent header sent with downloads
    pub user_agent: Option<String>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            bin_dir: default_bin_dir(),
            http_timeout_secs: HTTP_TIMEOUT.as_secs(),
            verify_timeout_secs: VERIFY_TIMEOUT.as_secs(),
            user_agent: None,
        }
    }
}

impl InstallerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::IoError(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid config: {}", e)))
    }

    /// Load from an explicit path, or from the default location if present
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => {
                debug!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }
}

/// `<config dir>/tapster/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tapster").join("config.toml"))
}

/// The user's executable directory, or `~/.local/bin`
pub fn default_bin_dir() -> PathBuf {
    dirs::executable_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("bin")))
        .unwrap_or_else(|| PathBuf::from("bin"))
}
