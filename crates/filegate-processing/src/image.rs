//! Image probing and sanitization.
//!
//! A `.jpg` extension proves nothing about the bytes behind it. The probe
//! requires the file to parse as an image with real dimensions; the
//! sanitizer then decodes it fully, bounds its size, and re-encodes a fresh
//! JPEG over the temp file, so only pixel data reaches storage.

use std::fs;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, ImageReader};

use filegate_core::UploadError;

/// Parse the file's image header and return its dimensions.
///
/// Header-only: a truncated body can still pass here and is caught by the
/// full decode in [`sanitize`].
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), UploadError> {
    let reader = ImageReader::open(path)
        .map_err(|_| UploadError::NotAnImage)?
        .with_guessed_format()
        .map_err(|_| UploadError::NotAnImage)?;
    reader.into_dimensions().map_err(|_| UploadError::NotAnImage)
}

/// Select a resize filter based on how hard the image is being shrunk.
fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Decode the image fully, downscale so its long edge is at most
/// `max_dimension` (aspect ratio preserved), and overwrite the temp file
/// with a freshly encoded JPEG.
///
/// Returns the stored dimensions.
pub fn sanitize(path: &Path, max_dimension: u32, quality: u8) -> Result<(u32, u32), UploadError> {
    let reader = ImageReader::open(path)
        .map_err(|e| UploadError::ImageDecodeFailed(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| UploadError::ImageDecodeFailed(e.to_string()))?;
    let img = reader
        .decode()
        .map_err(|e| UploadError::ImageDecodeFailed(e.to_string()))?;

    let (orig_width, orig_height) = img.dimensions();
    let img = if orig_width.max(orig_height) > max_dimension {
        let filter = select_filter(orig_width, orig_height, max_dimension, max_dimension);
        // `resize` fits within the bounding box, preserving aspect ratio.
        let resized = img.resize(max_dimension, max_dimension, filter);
        tracing::debug!(
            from_width = orig_width,
            from_height = orig_height,
            to_width = resized.width(),
            to_height = resized.height(),
            "Downscaled image during sanitization"
        );
        resized
    } else {
        img
    };

    let rgb = img.to_rgb8();
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| UploadError::ImageDecodeFailed(format!("re-encode failed: {}", e)))?;

    fs::write(path, &buffer).map_err(|e| {
        UploadError::ImageDecodeFailed(format!("failed to rewrite sanitized image: {}", e))
    })?;

    Ok((rgb.width(), rgb.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn write_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_pixel(width, height, Rgb([180, 40, 40]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
            .unwrap();
        fs::write(path, &buffer).unwrap();
    }

    #[test]
    fn probe_returns_dimensions_for_valid_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo");
        write_test_jpeg(&path, 320, 200);

        assert_eq!(probe_dimensions(&path).unwrap(), (320, 200));
    }

    #[test]
    fn probe_rejects_non_image_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script");
        fs::write(&path, b"#!/bin/sh\nrm -rf /\n").unwrap();

        assert!(matches!(
            probe_dimensions(&path),
            Err(UploadError::NotAnImage)
        ));
    }

    #[test]
    fn sanitize_downscales_long_edge_preserving_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big");
        write_test_jpeg(&path, 2048, 1024);

        let (width, height) = sanitize(&path, 1024, 85).unwrap();
        assert_eq!((width, height), (1024, 512));

        // the rewritten file reflects the new dimensions
        assert_eq!(probe_dimensions(&path).unwrap(), (1024, 512));
    }

    #[test]
    fn sanitize_keeps_small_images_unscaled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small");
        write_test_jpeg(&path, 400, 300);

        let (width, height) = sanitize(&path, 1024, 85).unwrap();
        assert_eq!((width, height), (400, 300));
    }

    #[test]
    fn sanitize_fails_on_undecodable_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake");
        // JPEG magic with no decodable body behind it
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        bytes.extend_from_slice(b"definitely not image data");
        fs::write(&path, &bytes).unwrap();

        assert!(matches!(
            sanitize(&path, 1024, 85),
            Err(UploadError::ImageDecodeFailed(_))
        ));
    }

    #[test]
    fn select_filter_scales_with_ratio() {
        assert_eq!(select_filter(4096, 4096, 1024, 1024), FilterType::Triangle);
        assert_eq!(
            select_filter(1800, 1800, 1024, 1024),
            FilterType::CatmullRom
        );
        assert_eq!(select_filter(1100, 1100, 1024, 1024), FilterType::Lanczos3);
    }
}
