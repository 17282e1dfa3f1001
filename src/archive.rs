// src/archive.rs

//! Release artifact formats and extraction
//!
//! Release downloads are usually compressed tarballs, but some projects
//! publish the bare executable. The format is taken from the file name when
//! it is recognizable and from magic bytes otherwise.

use crate::error::{Error, Result};
use std::io::Read;
use std::path::{Component, Path};
use tar::Archive;
use tracing::debug;

/// Compression applied to a tarball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// No compression (raw data)
    None,
    /// Gzip compression (.gz)
    Gzip,
    /// XZ/LZMA compression (.xz)
    Xz,
    /// Zstandard compression (.zst)
    Zstd,
}

impl CompressionFormat {
    /// Detect compression format from magic bytes
    ///
    /// - Gzip: `1f 8b`
    /// - XZ: `fd 37 7a 58 5a 00`
    /// - Zstd: `28 b5 2f fd`
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x1f, 0x8b]) {
            Self::Gzip
        } else if data.starts_with(&[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00]) {
            Self::Xz
        } else if data.starts_with(&[0x28, 0xb5, 0x2f, 0xfd]) {
            Self::Zstd
        } else {
            Self::None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }
}

impl std::fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Shape of a downloaded artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A tarball, possibly compressed
    Tarball(CompressionFormat),
    /// The executable itself
    Raw,
}

impl ArtifactKind {
    /// Detect from file name, falling back to content
    pub fn detect(filename: &str, data: &[u8]) -> Self {
        Self::from_filename(filename).unwrap_or_else(|| Self::from_magic_bytes(data))
    }

    /// Detect from file name alone
    pub fn from_filename(filename: &str) -> Option<Self> {
        let name = filename.to_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::Tarball(CompressionFormat::Gzip))
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Some(Self::Tarball(CompressionFormat::Xz))
        } else if name.ends_with(".tar.zst") || name.ends_with(".tar.zstd") {
            Some(Self::Tarball(CompressionFormat::Zstd))
        } else if name.ends_with(".tar") {
            Some(Self::Tarball(CompressionFormat::None))
        } else {
            None
        }
    }

    /// Detect from content
    ///
    /// Compressed data is assumed to be a tarball; uncompressed data is a
    /// tarball only if it carries the `ustar` magic at offset 257.
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        match CompressionFormat::from_magic_bytes(data) {
            CompressionFormat::None => {
                if data.len() > 262 && &data[257..262] == b"ustar" {
                    Self::Tarball(CompressionFormat::None)
                } else {
                    Self::Raw
                }
            }
            compressed => Self::Tarball(compressed),
        }
    }
}

/// Create a decompressing reader for the given format
pub fn create_decoder<'a, R: Read + 'a>(
    reader: R,
    format: CompressionFormat,
) -> Result<Box<dyn Read + 'a>> {
    match format {
        CompressionFormat::None => Ok(Box::new(reader)),
        CompressionFormat::Gzip => Ok(Box::new(flate2::read::GzDecoder::new(reader))),
        CompressionFormat::Xz => Ok(Box::new(xz2::read::XzDecoder::new(reader))),
        CompressionFormat::Zstd => {
            let decoder = zstd::Decoder::new(reader)
                .map_err(|e| Error::IoError(format!("Failed to create zstd decoder: {}", e)))?;
            Ok(Box::new(decoder))
        }
    }
}

/// Extract a tarball into `dest`
///
/// Entries with absolute paths or `..` components are rejected before
/// anything is written for them. Returns the number of entries unpacked.
pub fn extract_tarball(data: &[u8], format: CompressionFormat, dest: &Path) -> Result<usize> {
    let decoder = create_decoder(data, format)?;
    let mut archive = Archive::new(decoder);
    archive.set_preserve_permissions(true);

    let mut count = 0;
    let entries = archive
        .entries()
        .map_err(|e| Error::IoError(format!("Failed to read {} tarball: {}", format, e)))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::IoError(format!("Corrupt tarball entry: {}", e)))?;
        let path = entry
            .path()
            .map_err(|e| Error::IoError(format!("Invalid entry path: {}", e)))?
            .into_owned();

        if !is_contained(&path) {
            return Err(Error::IoError(format!(
                "Archive entry escapes extraction directory: {}",
                path.display()
            )));
        }

        debug!("Extracting {}", path.display());
        entry.unpack_in(dest).map_err(|e| {
            Error::IoError(format!("Failed to extract {}: {}", path.display(), e))
        })?;
        count += 1;
    }

    Ok(count)
}

fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tarball(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(
            ArtifactKind::from_filename("skyscraper-0.1.0-universal-apple-darwin.tar.gz"),
            Some(ArtifactKind::Tarball(CompressionFormat::Gzip))
        );
        assert_eq!(
            ArtifactKind::from_filename("tool.TAR.XZ"),
            Some(ArtifactKind::Tarball(CompressionFormat::Xz))
        );
        assert_eq!(
            ArtifactKind::from_filename("tool.tar.zst"),
            Some(ArtifactKind::Tarball(CompressionFormat::Zstd))
        );
        assert_eq!(ArtifactKind::from_filename("tool-linux-amd64"), None);
    }

    #[test]
    fn test_kind_from_magic_bytes() {
        assert_eq!(
            ArtifactKind::from_magic_bytes(&[0x1f, 0x8b, 0x08, 0x00]),
            ArtifactKind::Tarball(CompressionFormat::Gzip)
        );
        assert_eq!(ArtifactKind::from_magic_bytes(b"#!/bin/sh\n"), ArtifactKind::Raw);

        let tar = tarball(&[("tool", b"x")]);
        assert_eq!(
            ArtifactKind::from_magic_bytes(&tar),
            ArtifactKind::Tarball(CompressionFormat::None)
        );
    }

    #[test]
    fn test_extract_plain_tarball() {
        let dir = tempfile::tempdir().unwrap();
        let tar = tarball(&[("pkg/bin/tool", b"binary")]);

        let count = extract_tarball(&tar, CompressionFormat::None, dir.path()).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            std::fs::read(dir.path().join("pkg/bin/tool")).unwrap(),
            b"binary"
        );
    }

    #[test]
    fn test_extract_gzip_tarball() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let tar = tarball(&[("tool", b"binary")]);
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar).unwrap();
        let gz = encoder.finish().unwrap();

        let dir = tempfile::tempdir().unwrap();
        extract_tarball(&gz, CompressionFormat::Gzip, dir.path()).unwrap();
        assert!(dir.path().join("tool").exists());
    }

    #[test]
    fn test_extract_rejects_traversal() {
        let mut builder = tar::Builder::new(Vec::new());
        let data = b"evil";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        // Write the path directly; append_data refuses `..` components.
        header.as_gnu_mut().unwrap().name[..10].copy_from_slice(b"../escaped");
        header.set_cksum();
        builder.append(&header, &data[..]).unwrap();
        let tar = builder.into_inner().unwrap();

        let root = tempfile::tempdir().unwrap();
        let dest = root.path().join("stage");
        std::fs::create_dir(&dest).unwrap();

        let err = extract_tarball(&tar, CompressionFormat::None, &dest).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
        assert!(!root.path().join("escaped").exists());
    }

    #[test]
    fn test_corrupt_gzip_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data = [0x1f, 0x8b, 0xff, 0xff, 0xff];
        assert!(extract_tarball(&data, CompressionFormat::Gzip, dir.path()).is_err());
    }
}
