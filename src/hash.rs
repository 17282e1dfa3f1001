// src/hash.rs

//! SHA-256 hashing for downloaded artifacts
//!
//! Recipes pin artifacts with a bare lowercase hex digest. Comparison is
//! case-insensitive so digests copied from release pages in upper case
//! still verify.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::io::{self, Read};
use std::path::Path;

/// Compute the hex SHA-256 of a byte slice
pub fn sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Compute the hex SHA-256 of everything a reader yields
pub fn sha256_reader<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Compute the hex SHA-256 of a file
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| Error::IoError(format!("Failed to open {}: {}", path.display(), e)))?;
    sha256_reader(&mut file)
        .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))
}

/// Verify bytes match an expected SHA-256
pub fn verify_sha256(data: &[u8], expected: &str) -> Result<()> {
    let actual = sha256(data);
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(Error::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256(b"Hello, World!"),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_reader_matches_slice() {
        let data = vec![7u8; 20_000];
        let from_reader = sha256_reader(&mut data.as_slice()).unwrap();
        assert_eq!(from_reader, sha256(&data));
    }

    #[test]
    fn test_verify_case_insensitive() {
        let hash = "B94D27B9934D3E08A52E52D7DA7DABFAC484EFE37A5380EE9088F7ACE2EFCDE9";
        assert!(verify_sha256(b"hello world", hash).is_ok());
    }

    #[test]
    fn test_verify_mismatch() {
        let err = verify_sha256(b"hello world", &"0".repeat(64)).unwrap_err();
        match err {
            Error::ChecksumMismatch { actual, .. } => {
                assert_eq!(actual, sha256(b"hello world"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sha256_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"hello world").unwrap();
        assert_eq!(sha256_file(file.path()).unwrap(), sha256(b"hello world"));
    }
}
