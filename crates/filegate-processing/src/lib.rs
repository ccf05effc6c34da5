//! Filegate Processing Library
//!
//! The upload validation pipeline: content sniffing, spool verification,
//! image probing and sanitization, relocation, and the [`UploadValidator`]
//! that sequences them.

pub mod image;
pub mod relocate;
pub mod sniff;
pub mod spool;
pub mod validator;

pub use spool::{SpoolDirWitness, UploadWitness};
pub use validator::UploadValidator;
