//! The upload validation pipeline.
//!
//! [`UploadValidator`] wraps one raw descriptor and runs a fixed sequence of
//! checks and transformations over it, short-circuiting on the first
//! failure. Failures never escape [`UploadValidator::validate`]: the
//! validator captures the error, clears every output field, and leaves the
//! result to be read through accessors. One validator validates one upload;
//! re-running a finished validator is not supported and is a no-op.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use filegate_core::{TransportCode, UploadConfig, UploadDescriptor, UploadError};

use crate::image;
use crate::relocate;
use crate::sniff;
use crate::spool::{SpoolDirWitness, UploadWitness};

pub struct UploadValidator {
    descriptor: UploadDescriptor,
    config: UploadConfig,
    witness: Box<dyn UploadWitness>,
    finished: bool,

    content_mime: Option<String>,
    extension: Option<&'static str>,
    generated_name: Option<String>,
    is_image: bool,
    final_path: Option<PathBuf>,
    failure: Option<UploadError>,
}

impl UploadValidator {
    /// Wrap a raw descriptor. No validation happens here.
    pub fn new(descriptor: UploadDescriptor, config: UploadConfig) -> Self {
        let witness = Box::new(SpoolDirWitness::new(config.spool_dir.clone()));
        Self::with_witness(descriptor, config, witness)
    }

    /// Like [`UploadValidator::new`] with a caller-supplied upload witness.
    pub fn with_witness(
        descriptor: UploadDescriptor,
        config: UploadConfig,
        witness: Box<dyn UploadWitness>,
    ) -> Self {
        Self {
            descriptor,
            config,
            witness,
            finished: false,
            content_mime: None,
            extension: None,
            generated_name: None,
            is_image: false,
            final_path: None,
            failure: None,
        }
    }

    /// Run the pipeline. Blocking; returns when the upload has either been
    /// relocated or rejected. Inspect the outcome through the accessors.
    pub fn validate(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        if let Err(err) = self.run() {
            tracing::warn!(
                error = %err,
                temp_path = %self.descriptor.temp_path.display(),
                client_name = self.descriptor.client_name.as_deref().unwrap_or(""),
                "Upload rejected"
            );
            self.reset_outputs();
            self.failure = Some(err);
        }
    }

    fn run(&mut self) -> Result<(), UploadError> {
        // Structural integrity: the error field must be a single scalar.
        let code = self.descriptor.error.as_scalar().ok_or_else(|| {
            UploadError::MalformedDescriptor("transport error code is not a scalar".to_string())
        })?;

        // Transport verdict.
        if code != TransportCode::OK {
            return Err(UploadError::Transport(TransportCode::from_code(code)));
        }

        // The temp path must be a file the hosting layer actually spooled.
        let temp_path = self.descriptor.temp_path.clone();
        if !self.witness.confirm(&temp_path) {
            return Err(UploadError::NotAnUploadedFile(
                temp_path.display().to_string(),
            ));
        }

        // Size gate before any content inspection.
        if self.descriptor.declared_size == 0 {
            return Err(UploadError::EmptyFile);
        }
        if self.descriptor.declared_size > self.config.max_file_size {
            return Err(UploadError::FileTooLarge {
                size: self.descriptor.declared_size,
                max: self.config.max_file_size,
            });
        }

        // True type from magic bytes, then the allowlisted extension.
        let mime = sniff::detect_mime(&temp_path)?;
        let ext = sniff::derive_extension(&mime)?;
        self.content_mime = Some(mime);
        self.extension = Some(ext);

        // Fresh name; no client-supplied string ever feeds into it. The
        // suffix is gated a second time against the literal whitelist.
        let name = format!("{}.{}", Uuid::new_v4(), ext);
        sniff::check_generated_name(&name)?;
        self.generated_name = Some(name.clone());

        if ext == "jpg" {
            self.is_image = true;
            image::probe_dimensions(&temp_path)?;
            let (width, height) = image::sanitize(
                &temp_path,
                self.config.max_image_dimension,
                self.config.jpeg_quality,
            )?;
            tracing::debug!(width, height, "Image sanitized and re-encoded");
        }

        let final_path = relocate::relocate(&temp_path, &self.config.destination_dir, &name)?;

        tracing::info!(
            final_path = %final_path.display(),
            generated_name = %name,
            content_mime = self.content_mime.as_deref().unwrap_or(""),
            is_image = self.is_image,
            "Upload validated"
        );
        self.final_path = Some(final_path);
        Ok(())
    }

    fn reset_outputs(&mut self) {
        self.content_mime = None;
        self.extension = None;
        self.generated_name = None;
        self.is_image = false;
        self.final_path = None;
    }

    /// Where the validated file now lives. `None` until success.
    pub fn final_path(&self) -> Option<&Path> {
        self.final_path.as_deref()
    }

    /// The collision-resistant stored filename. `None` until success.
    pub fn generated_name(&self) -> Option<&str> {
        self.generated_name.as_deref()
    }

    /// MIME type sniffed from the file's content. `None` on failure.
    pub fn content_mime(&self) -> Option<&str> {
        self.content_mime.as_deref()
    }

    /// Whether the stored file is a sanitized image.
    pub fn is_image(&self) -> bool {
        self.is_image
    }

    /// Whether validation failed.
    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    /// The captured failure, if any.
    pub fn failure(&self) -> Option<&UploadError> {
        self.failure.as_ref()
    }

    /// Human-readable cause of the failure, if any.
    pub fn failure_message(&self) -> Option<String> {
        self.failure.as_ref().map(|err| err.to_string())
    }
}
