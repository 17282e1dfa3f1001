// src/error.rs

//! Error types for recipe loading and installation

use std::fmt;
use thiserror::Error;

/// Result type used throughout tapster
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, fetching, installing or verifying a recipe
#[derive(Error, Debug)]
pub enum Error {
    /// Recipe or template could not be parsed
    #[error("parse error: {0}")]
    ParseError(String),

    /// No platform rule matches the running environment
    #[error("unsupported platform: no rule matches {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// Transport-level failure (DNS, connect, TLS, truncated body)
    #[error("network error: {0}")]
    NetworkError(String),

    /// Artifact does not exist (HTTP 4xx or missing local file)
    #[error("not found: {0}")]
    NotFound(String),

    /// Remote server failed (HTTP 5xx)
    #[error("server error: HTTP {status} from {url}")]
    ServerError { status: u16, url: String },

    /// Filesystem failure
    #[error("I/O error: {0}")]
    IoError(String),

    /// Downloaded artifact does not match the recipe's checksum
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Installed binary failed its test command
    #[error("verification failed: {0}")]
    VerificationError(String),

    /// Wrapped failure of one executor step
    #[error(transparent)]
    Step(#[from] Box<StepError>),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}

impl Error {
    /// The innermost error, looking through step wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::Step(step) => step.source.root(),
            other => other,
        }
    }

    /// Process exit code for this error kind
    ///
    /// Code 2 belongs to clap usage errors and is never returned here.
    pub fn exit_code(&self) -> i32 {
        match self.root() {
            Error::ParseError(_) => 10,
            Error::UnsupportedPlatform { .. } => 3,
            Error::NetworkError(_) => 4,
            Error::NotFound(_) => 5,
            Error::ServerError { .. } => 6,
            Error::IoError(_) => 7,
            Error::ChecksumMismatch { .. } => 8,
            Error::VerificationError(_) => 9,
            Error::Step(_) => 1,
        }
    }
}

/// A stage of the install pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Resolve,
    Fetch,
    Checksum,
    Install,
    Verify,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Fetch => "fetch",
            Self::Checksum => "checksum",
            Self::Install => "install",
            Self::Verify => "verify",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error annotated with the recipe and the step that produced it
#[derive(Error, Debug)]
#[error("{recipe}: {step} failed: {source}")]
pub struct StepError {
    pub recipe: String,
    pub step: Step,
    #[source]
    pub source: Error,
}

impl StepError {
    pub fn new(recipe: impl Into<String>, step: Step, source: Error) -> Self {
        Self {
            recipe: recipe.into(),
            step,
            source,
        }
    }
}

/// Extension for tagging a `Result` with the failing step
pub trait StepContext<T> {
    fn step(self, recipe: &str, step: Step) -> Result<T>;
}

impl<T> StepContext<T> for Result<T> {
    fn step(self, recipe: &str, step: Step) -> Result<T> {
        self.map_err(|e| Error::Step(Box::new(StepError::new(recipe, step, e))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_display() {
        let err: Result<()> = Err(Error::NotFound("https://example.com/a.tar.gz".to_string()));
        let err = err.step("skyscraper", Step::Fetch).unwrap_err();
        assert_eq!(
            err.to_string(),
            "skyscraper: fetch failed: not found: https://example.com/a.tar.gz"
        );
    }

    #[test]
    fn test_exit_code_looks_through_step() {
        let err: Result<()> = Err(Error::VerificationError("no output".to_string()));
        let err = err.step("skyscraper", Step::Verify).unwrap_err();
        assert_eq!(err.exit_code(), 9);
        assert!(matches!(err.root(), Error::VerificationError(_)));
    }

    #[test]
    fn test_exit_codes_distinct() {
        let codes = [
            Error::ParseError(String::new()).exit_code(),
            Error::UnsupportedPlatform {
                os: "plan9".into(),
                arch: "mips".into(),
            }
            .exit_code(),
            Error::NetworkError(String::new()).exit_code(),
            Error::NotFound(String::new()).exit_code(),
            Error::ServerError {
                status: 500,
                url: String::new(),
            }
            .exit_code(),
            Error::IoError(String::new()).exit_code(),
            Error::ChecksumMismatch {
                expected: String::new(),
                actual: String::new(),
            }
            .exit_code(),
            Error::VerificationError(String::new()).exit_code(),
        ];
        let mut sorted = codes.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
        assert!(codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_parse_error_code_differs_from_usage_error() {
        let usage = clap::error::ErrorKind::MissingRequiredArgument;
        let clap_code = clap::Error::new(usage).exit_code();
        assert_eq!(clap_code, 2);
        assert_ne!(Error::ParseError(String::new()).exit_code(), clap_code);
    }
}
