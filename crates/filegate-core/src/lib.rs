//! Filegate Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, and
//! constants shared by the filegate pipeline.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{ConfigError, UploadConfig};
pub use error::UploadError;
pub use models::{ErrorField, TransportCode, UploadDescriptor};
