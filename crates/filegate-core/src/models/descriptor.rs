//! Raw upload descriptor as delivered by the hosting layer.
//!
//! Every field here is attacker-controlled and must be revalidated by the
//! pipeline. The descriptor is a plain record: constructing one performs no
//! checks of any kind.

use std::fmt;
use std::path::PathBuf;

/// The transport error-code field exactly as the hosting layer handed it
/// over. Batch uploads deliver one code per file; this pipeline accepts a
/// single scalar code only, and the structural check rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorField {
    Code(i64),
    Batch(Vec<i64>),
}

impl ErrorField {
    /// The scalar code, or `None` for a composite value.
    pub fn as_scalar(&self) -> Option<i64> {
        match self {
            ErrorField::Code(code) => Some(*code),
            ErrorField::Batch(_) => None,
        }
    }
}

/// Raw record describing an in-flight upload.
#[derive(Debug, Clone)]
pub struct UploadDescriptor {
    /// Transport error code field, scalar when the transport is intact.
    pub error: ErrorField,
    /// Temporary file written by the hosting layer.
    pub temp_path: PathBuf,
    /// Size in bytes as declared by the transport.
    pub declared_size: u64,
    /// Client-supplied filename. Logged for context, never trusted and
    /// never consulted for any validation or naming decision.
    pub client_name: Option<String>,
}

impl UploadDescriptor {
    pub fn new(error: ErrorField, temp_path: impl Into<PathBuf>, declared_size: u64) -> Self {
        Self {
            error,
            temp_path: temp_path.into(),
            declared_size,
            client_name: None,
        }
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }
}

/// Fixed taxonomy of transport-level upload failures, keyed by the scalar
/// error code. Code 0 is the "no error" sentinel and never maps here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCode {
    /// Code 1: upload exceeds the server-wide size limit.
    ExceedsServerMaxSize,
    /// Code 2: upload exceeds the size limit declared in the form.
    ExceedsFormMaxSize,
    /// Code 3: the file was only partially received.
    PartialUpload,
    /// Code 4: no file was selected for upload.
    NoFileSelected,
    /// Code 6: the server has no temporary storage directory.
    MissingTempStorage,
    /// Code 7: the server failed to write the file to disk.
    WriteFailure,
    /// Code 8: an extension blocked the upload.
    ExtensionBlocked,
    /// Any code outside the fixed taxonomy.
    Unknown(i64),
}

impl TransportCode {
    /// Sentinel value meaning the transport reported no error.
    pub const OK: i64 = 0;

    pub fn from_code(code: i64) -> Self {
        match code {
            1 => TransportCode::ExceedsServerMaxSize,
            2 => TransportCode::ExceedsFormMaxSize,
            3 => TransportCode::PartialUpload,
            4 => TransportCode::NoFileSelected,
            6 => TransportCode::MissingTempStorage,
            7 => TransportCode::WriteFailure,
            8 => TransportCode::ExtensionBlocked,
            other => TransportCode::Unknown(other),
        }
    }
}

impl fmt::Display for TransportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportCode::ExceedsServerMaxSize => {
                write!(f, "The uploaded file exceeds the server's maximum file size")
            }
            TransportCode::ExceedsFormMaxSize => {
                write!(f, "The uploaded file exceeds the size declared in the form")
            }
            TransportCode::PartialUpload => {
                write!(f, "The file was only partially uploaded")
            }
            TransportCode::NoFileSelected => write!(f, "No file was uploaded"),
            TransportCode::MissingTempStorage => {
                write!(f, "The server is missing a temporary directory for uploads")
            }
            TransportCode::WriteFailure => {
                write!(f, "The server failed to write the uploaded file to disk")
            }
            TransportCode::ExtensionBlocked => {
                write!(f, "A server extension stopped the file upload")
            }
            TransportCode::Unknown(code) => {
                write!(f, "Unknown upload transport error (code {})", code)
            }
        }
    }
}
