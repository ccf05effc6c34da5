//! Error types module
//!
//! The pipeline's failure taxonomy. Every stage failure is one of these
//! variants; the validator catches the error at its boundary and exposes it
//! through accessors rather than propagating it to the caller.

use crate::models::TransportCode;

/// Failure raised by a pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Malformed upload descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("{0}")]
    Transport(TransportCode),

    #[error("Not an uploaded file: {0}")]
    NotAnUploadedFile(String),

    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Disallowed file type: {0}")]
    DisallowedType(String),

    #[error("Invalid extension on generated name: {0}")]
    InvalidExtension(String),

    #[error("File is not a valid image")]
    NotAnImage,

    #[error("Image decode failed: {0}")]
    ImageDecodeFailed(String),

    #[error("Relocation failed: {0}")]
    RelocationFailed(String),
}
