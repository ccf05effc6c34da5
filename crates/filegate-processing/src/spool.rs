//! Genuine-upload verification.
//!
//! The descriptor's temp path is attacker-influenced; before any byte of it
//! is trusted, the pipeline confirms the path actually names a file the
//! hosting layer spooled for this upload, not an arbitrary server-side file
//! smuggled in by name.

use std::fs;
use std::path::{Path, PathBuf};

/// Confirms that a temp path was produced by the hosting environment's
/// upload machinery. Hosting layers with a stronger notion of provenance
/// can substitute their own implementation.
pub trait UploadWitness {
    fn confirm(&self, path: &Path) -> bool;
}

/// Default witness: the path must be a regular file (not a symlink, not a
/// directory) whose canonical location lies inside the upload spool
/// directory.
pub struct SpoolDirWitness {
    spool_dir: PathBuf,
}

impl SpoolDirWitness {
    pub fn new(spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            spool_dir: spool_dir.into(),
        }
    }
}

impl UploadWitness for SpoolDirWitness {
    fn confirm(&self, path: &Path) -> bool {
        // symlink_metadata so a symlink planted in the spool dir cannot
        // point the pipeline at a file elsewhere.
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(_) => return false,
        };
        if !meta.is_file() {
            return false;
        }

        let canonical = match path.canonicalize() {
            Ok(canonical) => canonical,
            Err(_) => return false,
        };
        let base = match self.spool_dir.canonicalize() {
            Ok(base) => base,
            Err(e) => {
                tracing::warn!(
                    spool_dir = %self.spool_dir.display(),
                    error = %e,
                    "Failed to canonicalize spool directory"
                );
                return false;
            }
        };

        canonical.strip_prefix(&base).is_ok()
    }
}
