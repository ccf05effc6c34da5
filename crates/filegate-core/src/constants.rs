//! Application-wide constants.

/// Maximum accepted upload size in bytes (10 MiB). Enforced against the
/// declared size before any content inspection.
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Longest edge allowed for a stored image, in pixels. Larger images are
/// downscaled during sanitization, preserving aspect ratio.
pub const MAX_IMAGE_DIMENSION_PX: u32 = 1024;

/// JPEG quality (0-100) used when re-encoding sanitized images.
pub const JPEG_QUALITY: u8 = 85;
