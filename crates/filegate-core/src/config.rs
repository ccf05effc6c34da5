//! Configuration module
//!
//! Settings for the upload pipeline: where validated files land, where the
//! hosting layer spools temporary uploads, and the size/image limits. The
//! destination directory is expected to live outside any publicly served
//! document root; that expectation is the deployment's to uphold, not
//! validated here.

use std::env;
use std::path::PathBuf;

use crate::constants::{JPEG_QUALITY, MAX_FILE_SIZE_BYTES, MAX_IMAGE_DIMENSION_PX};

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Upload pipeline configuration.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory validated files are moved into.
    pub destination_dir: PathBuf,
    /// Directory the hosting layer writes temporary uploads to. Used to
    /// confirm a temp path genuinely came from an upload.
    pub spool_dir: PathBuf,
    /// Maximum accepted declared size in bytes.
    pub max_file_size: u64,
    /// Longest stored image edge in pixels.
    pub max_image_dimension: u32,
    /// JPEG re-encode quality (0-100).
    pub jpeg_quality: u8,
}

impl UploadConfig {
    /// Build a configuration with the default limits.
    pub fn new(destination_dir: impl Into<PathBuf>, spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            destination_dir: destination_dir.into(),
            spool_dir: spool_dir.into(),
            max_file_size: MAX_FILE_SIZE_BYTES,
            max_image_dimension: MAX_IMAGE_DIMENSION_PX,
            jpeg_quality: JPEG_QUALITY,
        }
    }

    /// Load configuration from the environment.
    ///
    /// `FILEGATE_DESTINATION_DIR` is required. `FILEGATE_SPOOL_DIR` defaults
    /// to the OS temp directory; the numeric limits default to the values in
    /// [`crate::constants`].
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let destination_dir = env::var("FILEGATE_DESTINATION_DIR")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::MissingVar("FILEGATE_DESTINATION_DIR"))?;

        let spool_dir = env::var("FILEGATE_SPOOL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir());

        let max_file_size = parse_var("FILEGATE_MAX_FILE_SIZE_BYTES", MAX_FILE_SIZE_BYTES)?;
        let max_image_dimension =
            parse_var("FILEGATE_MAX_IMAGE_DIMENSION", MAX_IMAGE_DIMENSION_PX)?;
        let jpeg_quality = parse_var("FILEGATE_JPEG_QUALITY", JPEG_QUALITY)?;

        Ok(Self {
            destination_dir,
            spool_dir,
            max_file_size,
            max_image_dimension,
            jpeg_quality,
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidVar { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_default_limits() {
        let config = UploadConfig::new("/var/lib/filegate/files", "/tmp");
        assert_eq!(config.max_file_size, MAX_FILE_SIZE_BYTES);
        assert_eq!(config.max_image_dimension, MAX_IMAGE_DIMENSION_PX);
        assert_eq!(config.jpeg_quality, JPEG_QUALITY);
        assert_eq!(
            config.destination_dir,
            PathBuf::from("/var/lib/filegate/files")
        );
    }

    #[test]
    fn parse_var_falls_back_to_default_when_unset() {
        let value: u64 = parse_var("FILEGATE_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }
}
