// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::{Path, PathBuf};
use tapster::{InstallerConfig, Recipe, parse_recipe};
use tempfile::TempDir;

/// Shell script that behaves like `skyscraper --version`.
pub const SKYSCRAPER_SCRIPT: &str = "#!/bin/sh\necho \"skyscraper 0.1.0\"\n";

/// Build a gzip-compressed tarball from `(path, contents, mode)` entries.
pub fn tar_gz(entries: &[(&str, &[u8], u32)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, data, mode) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(*mode);
        header.set_cksum();
        builder.append_data(&mut header, path, *data).unwrap();
    }
    let tar = builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();
    encoder.finish().unwrap()
}

/// A release "server" on disk: a directory laid out like a release page.
///
/// Keep the returned TempDir alive for as long as the URLs are used.
pub struct Mirror {
    pub dir: TempDir,
}

impl Mirror {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Store `data` under `rel` and return its path.
    pub fn publish(&self, rel: &str, data: &[u8]) -> PathBuf {
        let path = self.dir.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, data).unwrap();
        path
    }

    /// `file://` URL prefix for this mirror, without a trailing slash.
    pub fn base_url(&self) -> String {
        url::Url::from_directory_path(self.dir.path())
            .unwrap()
            .as_str()
            .trim_end_matches('/')
            .to_string()
    }
}

/// Publish the skyscraper 0.1.0 release for every platform.
///
/// Returns the archive bytes.
pub fn publish_skyscraper(mirror: &Mirror) -> Vec<u8> {
    let archive = tar_gz(&[
        ("skyscraper", SKYSCRAPER_SCRIPT.as_bytes(), 0o755),
        ("LICENSE", b"MIT", 0o644),
    ]);
    mirror.publish("v0.1.0/skyscraper-0.1.0-any.tar.gz", &archive);
    archive
}

/// Recipe text for skyscraper served from `mirror`, with extra rule lines.
pub fn skyscraper_recipe_text(mirror: &Mirror, rule_extra: &str) -> String {
    format!(
        r#"
[package]
name = "skyscraper"
description = "A TUI client for Bluesky"
homepage = "https://github.com/cameronbanga/skyscraper-cli"
version = "0.1.0"

[[platform]]
url = "{base}/v#{{version}}/skyscraper-#{{version}}-any.tar.gz"
{rule_extra}

[install]
bin = ["skyscraper"]

[test]
args = ["--version"]
expect = "skyscraper"
"#,
        base = mirror.base_url(),
    )
}

pub fn skyscraper_recipe(mirror: &Mirror, rule_extra: &str) -> Recipe {
    parse_recipe(&skyscraper_recipe_text(mirror, rule_extra)).unwrap()
}

/// Installer configuration pointing at `bin_dir`.
pub fn config_for(bin_dir: &Path) -> InstallerConfig {
    InstallerConfig {
        bin_dir: bin_dir.to_path_buf(),
        ..Default::default()
    }
}

/// Sorted file names in a directory.
pub fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
