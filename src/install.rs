// src/install.rs

//! Binary placement
//!
//! Installation runs in two phases so that a failure never leaves a
//! half-written binary behind:
//!
//! 1. **Stage**: unpack the artifact into a temporary directory created
//!    inside the bin directory, then copy every binary the recipe names to
//!    its final file name within the staging area and mark it executable.
//! 2. **Place**: rename each staged binary over its destination. Renames
//!    within one filesystem are atomic, so a reinstall replaces the old
//!    binary in one step and a second run produces the same state.
//!
//! The staging directory is removed when installation returns, whether it
//! succeeded or not.

use crate::archive::{ArtifactKind, extract_tarball};
use crate::error::{Error, Result};
use crate::hash::sha256_file;
use crate::recipe::{BinEntry, Recipe};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// A binary written to the bin directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledFile {
    /// File name in the bin directory
    pub name: String,
    /// Full path of the installed binary
    pub path: PathBuf,
    /// SHA-256 of the installed binary
    pub sha256: String,
}

/// Install the binaries named by `recipe` from `artifact` into `bin_dir`
///
/// `artifact_name` is the download's file name, used to recognize the
/// archive format.
pub fn install(
    recipe: &Recipe,
    artifact: &[u8],
    artifact_name: &str,
    bin_dir: &Path,
) -> Result<Vec<InstalledFile>> {
    if recipe.install.bin.is_empty() {
        return Err(Error::ParseError(format!(
            "Recipe {} has no binaries to install",
            recipe.name()
        )));
    }

    recipe.install.check_entries()?;

    fs::create_dir_all(bin_dir).map_err(|e| {
        Error::IoError(format!("Failed to create {}: {}", bin_dir.display(), e))
    })?;

    let staging = tempfile::Builder::new()
        .prefix(".tapster-stage-")
        .tempdir_in(bin_dir)
        .map_err(|e| {
            Error::IoError(format!(
                "Failed to create staging directory in {}: {}",
                bin_dir.display(),
                e
            ))
        })?;

    let unpacked = staging.path().join("unpacked");
    let outgoing = staging.path().join("outgoing");
    fs::create_dir_all(&unpacked)?;
    fs::create_dir_all(&outgoing)?;

    unpack(recipe, artifact, artifact_name, &unpacked)?;

    let mut staged = Vec::with_capacity(recipe.install.bin.len());
    for entry in &recipe.install.bin {
        let source = locate(&unpacked, entry)?;
        let name = entry.installed_name();
        let target = outgoing.join(&name);

        fs::copy(&source, &target).map_err(|e| {
            Error::IoError(format!("Failed to stage {}: {}", entry.source(), e))
        })?;
        make_executable(&target)?;

        debug!("Staged {} as {}", source.display(), name);
        staged.push((name, target));
    }

    place(staged, bin_dir, &staging)
}

/// Unpack the artifact into `dest`
fn unpack(recipe: &Recipe, artifact: &[u8], artifact_name: &str, dest: &Path) -> Result<()> {
    match ArtifactKind::detect(artifact_name, artifact) {
        ArtifactKind::Tarball(format) => {
            info!("Extracting {} ({} tarball)", artifact_name, format);
            let count = extract_tarball(artifact, format, dest)?;
            debug!("Extracted {} entries", count);
        }
        ArtifactKind::Raw => {
            // A bare executable can only satisfy a single binary entry.
            let [entry] = recipe.install.bin.as_slice() else {
                return Err(Error::IoError(format!(
                    "{} is not an archive but the recipe installs {} binaries",
                    artifact_name,
                    recipe.install.bin.len()
                )));
            };
            info!("Artifact {} is a bare executable", artifact_name);
            let path = dest.join(entry.source());
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, artifact).map_err(|e| {
                Error::IoError(format!("Failed to write {}: {}", path.display(), e))
            })?;
        }
    }
    Ok(())
}

/// Find a binary inside the unpacked tree
///
/// Release tarballs often wrap their contents in one top-level directory
/// (`tool-1.0/tool`); when the path is not found at the root, that single
/// directory is searched instead.
fn locate(unpacked: &Path, entry: &BinEntry) -> Result<PathBuf> {
    let direct = unpacked.join(entry.source());
    if direct.is_file() {
        return Ok(direct);
    }

    let children: Vec<_> = fs::read_dir(unpacked)?.filter_map(|e| e.ok()).collect();
    if let [only] = children.as_slice() {
        if only.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            let nested = only.path().join(entry.source());
            if nested.is_file() {
                debug!("Found {} under {}", entry.source(), only.path().display());
                return Ok(nested);
            }
        }
    }

    Err(Error::IoError(format!(
        "Binary {} not found in downloaded artifact",
        entry.source()
    )))
}

/// Rename staged binaries into the bin directory
///
/// If a rename fails, binaries already placed by this call are removed.
fn place(
    staged: Vec<(String, PathBuf)>,
    bin_dir: &Path,
    staging: &TempDir,
) -> Result<Vec<InstalledFile>> {
    let mut installed: Vec<InstalledFile> = Vec::with_capacity(staged.len());

    for (name, from) in staged {
        let dest = bin_dir.join(&name);

        if let Err(e) = fs::rename(&from, &dest) {
            for done in &installed {
                if let Err(cleanup) = fs::remove_file(&done.path) {
                    warn!("Failed to remove {}: {}", done.path.display(), cleanup);
                }
            }
            return Err(Error::IoError(format!(
                "Failed to move {} into {}: {}",
                name,
                bin_dir.display(),
                e
            )));
        }

        let sha256 = sha256_file(&dest)?;
        info!("Installed {}", dest.display());
        installed.push(InstalledFile {
            name,
            path: dest,
            sha256,
        });
    }

    debug!("Removing staging directory {}", staging.path().display());
    Ok(installed)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| {
        Error::IoError(format!(
            "Failed to set permissions on {}: {}",
            path.display(),
            e
        ))
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
