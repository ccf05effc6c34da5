//! Domain models.

pub mod descriptor;

pub use descriptor::{ErrorField, TransportCode, UploadDescriptor};
