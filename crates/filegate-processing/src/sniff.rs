//! Content sniffing and the fixed type allowlist.
//!
//! The stored extension is derived from the sniffed MIME type alone. The
//! client's declared content type and filename never participate; a
//! disguised script keeps whatever magic bytes it actually has.

use std::path::Path;

use filegate_core::UploadError;

/// Allowed MIME types and the extension each maps to. This table is the
/// sole source of a stored file's extension.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("application/pdf", "pdf"),
    ("application/msword", "doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "docx",
    ),
];

/// Literal suffix whitelist applied to the generated name. Kept as a
/// separate list, not derived from [`ALLOWED_TYPES`].
const ALLOWED_SUFFIXES: &[&str] = &[".jpg", ".pdf", ".doc", ".docx"];

/// Detect the MIME type of the file at `path` from its magic bytes.
///
/// Content that no known signature matches is rejected outright; there is
/// no fallback to client-declared metadata.
pub fn detect_mime(path: &Path) -> Result<String, UploadError> {
    let kind = infer::get_from_path(path)
        .map_err(|e| UploadError::DisallowedType(format!("content could not be inspected: {}", e)))?;

    match kind {
        Some(kind) => Ok(kind.mime_type().to_string()),
        None => {
            tracing::warn!(
                path = %path.display(),
                "File content matches no known magic byte signature"
            );
            Err(UploadError::DisallowedType(
                "unrecognized content".to_string(),
            ))
        }
    }
}

/// Map a sniffed MIME type through the allowlist to its extension.
pub fn derive_extension(mime: &str) -> Result<&'static str, UploadError> {
    ALLOWED_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == mime)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| UploadError::DisallowedType(mime.to_string()))
}

/// Re-check a generated name's suffix against the literal whitelist.
pub fn check_generated_name(name: &str) -> Result<(), UploadError> {
    if ALLOWED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        Ok(())
    } else {
        Err(UploadError::InvalidExtension(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn derive_extension_maps_allowed_types() {
        assert_eq!(derive_extension("image/jpeg").unwrap(), "jpg");
        assert_eq!(derive_extension("application/pdf").unwrap(), "pdf");
        assert_eq!(derive_extension("application/msword").unwrap(), "doc");
        assert_eq!(
            derive_extension(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            )
            .unwrap(),
            "docx"
        );
    }

    #[test]
    fn derive_extension_rejects_everything_else() {
        for mime in ["text/plain", "image/png", "application/x-sh", "image/jpg"] {
            assert!(matches!(
                derive_extension(mime),
                Err(UploadError::DisallowedType(_))
            ));
        }
    }

    #[test]
    fn generated_name_suffixes_pass_the_literal_whitelist() {
        for ext in ["jpg", "pdf", "doc", "docx"] {
            let name = format!("4dfe27cc-93a2-4bb1-8f1a-6ad32f9b3d8e.{}", ext);
            assert!(check_generated_name(&name).is_ok());
        }
    }

    #[test]
    fn generated_name_rejects_foreign_suffixes() {
        assert!(check_generated_name("name.sh").is_err());
        assert!(check_generated_name("name.jpeg").is_err());
        assert!(check_generated_name("name").is_err());
        assert!(check_generated_name("name.docx.exe").is_err());
    }

    #[test]
    fn detect_mime_reads_magic_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.7\n%stub content").unwrap();
        let mime = detect_mime(file.path()).unwrap();
        assert_eq!(mime, "application/pdf");
    }

    #[test]
    fn detect_mime_rejects_unrecognized_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"#!/bin/sh\necho pwned\n").unwrap();
        assert!(matches!(
            detect_mime(file.path()),
            Err(UploadError::DisallowedType(_))
        ));
    }
}
