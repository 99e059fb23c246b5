//! Image backend trait and shared error type.
//!
//! The [`ImageBackend`] trait defines the two operations the editor needs
//! from an imaging library: decode a file and encode an image for the cache.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image backends.
///
/// Backends must be `Sync` so a single editor can serve concurrent requests.
pub trait ImageBackend: Sync {
    /// Decode the image stored at `path`.
    fn open(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode `img` as PNG bytes.
    fn encode_png(&self, img: &DynamicImage) -> Result<Vec<u8>, BackendError>;
}
