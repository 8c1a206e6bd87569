//
// outputs.rs
// C3d-Tools-rs
//
// Resolves declared output paths against the invocation directory, filters them by existence, and fingerprints produced files for reports.
//
// Thales Matheus Mendonça Santos - October 2026

use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::models::OutputRecord;

/// Resolve `path` against `base_dir` unless it is already absolute, dropping `.` components.
pub fn absolute_in(base_dir: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Keep the declared outputs that exist on disk, in declaration order, as absolute paths.
pub fn existing_outputs(base_dir: &Path, declared: &[PathBuf]) -> Vec<PathBuf> {
    declared
        .iter()
        .map(|p| absolute_in(base_dir, p))
        .filter(|p| {
            let present = p.exists();
            if !present {
                debug!(path = %p.display(), "declared output not produced, omitting");
            }
            present
        })
        .collect()
}

/// Declared outputs that are absent on disk, as absolute paths.
pub fn missing_outputs(base_dir: &Path, declared: &[PathBuf]) -> Vec<PathBuf> {
    declared
        .iter()
        .map(|p| absolute_in(base_dir, p))
        .filter(|p| !p.exists())
        .collect()
}

/// Size and SHA-256 of a file; absent files yield a record without fingerprint.
pub fn record(path: &Path) -> Result<OutputRecord> {
    if !path.exists() {
        return Ok(OutputRecord {
            path: path.to_path_buf(),
            exists: false,
            size: None,
            sha256: None,
        });
    }

    let io_err = |source: io::Error| ToolError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    let size = io::copy(&mut file, &mut hasher).map_err(io_err)?;

    Ok(OutputRecord {
        path: path.to_path_buf(),
        exists: true,
        size: Some(size),
        sha256: Some(hex::encode(hasher.finalize())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn absolute_in_joins_relative_and_keeps_absolute() {
        let base = Path::new("/data/run");
        assert_eq!(
            absolute_in(base, Path::new("./wx.nii.gz")),
            PathBuf::from("/data/run/wx.nii.gz")
        );
        assert_eq!(
            absolute_in(base, Path::new("/tmp/wy.nii.gz")),
            PathBuf::from("/tmp/wy.nii.gz")
        );
    }

    #[test]
    fn existing_outputs_preserve_order_and_drop_missing() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("c.nii"), b"c").expect("write c");
        fs::write(dir.path().join("a.nii"), b"a").expect("write a");

        let declared: Vec<PathBuf> = ["c.nii", "b.nii", "a.nii"].iter().map(PathBuf::from).collect();
        let found = existing_outputs(dir.path(), &declared);
        assert_eq!(found, vec![dir.path().join("c.nii"), dir.path().join("a.nii")]);

        let missing = missing_outputs(dir.path(), &declared);
        assert_eq!(missing, vec![dir.path().join("b.nii")]);
    }

    #[test]
    fn record_fingerprints_existing_files() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("affine.mat");
        fs::write(&path, b"abc").expect("write");

        let rec = record(&path).expect("record");
        assert!(rec.exists);
        assert_eq!(rec.size, Some(3));
        assert_eq!(
            rec.sha256.as_deref(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );

        let absent = record(&dir.path().join("none.mat")).expect("record absent");
        assert!(!absent.exists);
        assert!(absent.sha256.is_none());
    }
}
