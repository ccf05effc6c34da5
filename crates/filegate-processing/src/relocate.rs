//! Final relocation of a validated upload into the destination directory.

use std::fs;
use std::path::{Path, PathBuf};

use filegate_core::UploadError;

/// Move the validated temp file to `destination_dir/name`.
///
/// The destination directory is created if absent. `rename` is attempted
/// first; when the spool and destination live on different filesystems the
/// move falls back to copy + remove. Any I/O failure is fatal for this
/// invocation; no rollback is attempted.
pub fn relocate(
    temp_path: &Path,
    destination_dir: &Path,
    name: &str,
) -> Result<PathBuf, UploadError> {
    fs::create_dir_all(destination_dir).map_err(|e| {
        UploadError::RelocationFailed(format!(
            "failed to create destination directory {}: {}",
            destination_dir.display(),
            e
        ))
    })?;

    let target = destination_dir.join(name);
    let start = std::time::Instant::now();

    if fs::rename(temp_path, &target).is_err() {
        fs::copy(temp_path, &target).map_err(|e| {
            UploadError::RelocationFailed(format!(
                "failed to move {} to {}: {}",
                temp_path.display(),
                target.display(),
                e
            ))
        })?;
        fs::remove_file(temp_path).map_err(|e| {
            UploadError::RelocationFailed(format!(
                "failed to remove temp file {} after copy: {}",
                temp_path.display(),
                e
            ))
        })?;
    }

    tracing::info!(
        path = %target.display(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Upload relocated"
    );

    Ok(target)
}
