//! Upload store abstraction
//!
//! This module defines the `UploadStore` trait implemented by cover image backends.

use async_trait::async_trait;
use bytes::Bytes;
use pustaka_core::AppError;
use thiserror::Error;

/// Upload operation errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Format gambar harus {allowed}.")]
    UnsupportedType { allowed: String },

    #[error("Ukuran gambar maksimal {max_mb}MB.")]
    TooLarge { max_mb: usize },

    #[error("No free filename left for {0}")]
    NamesExhausted(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

/// A file received from a client, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original filename as sent by the client; may include a path.
    pub name: String,
    /// Declared MIME type, possibly with parameters.
    pub content_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Where a saved upload ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub filename: String,
    /// Public path stored on the book row, e.g. `/uploads/2026-10-17-cover.png`.
    pub reference_path: String,
}

/// Cover image storage.
///
/// `save` validates before touching the filesystem. `delete_by_reference` only ever acts on
/// references that belong to this store and treats an already missing file as success.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Validate and persist a file under a collision-free name.
    async fn save(&self, file: UploadFile) -> UploadResult<StoredUpload>;

    /// Delete the file behind a reference path. Returns whether a file was removed.
    async fn delete_by_reference(&self, reference_path: &str) -> UploadResult<bool>;

    /// Reference path prefix this store hands out, e.g. `/uploads`.
    fn public_prefix(&self) -> &str;
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnsupportedType { .. } => AppError::field("image", err.to_string()),
            UploadError::TooLarge { .. } => AppError::too_large("image", err.to_string()),
            UploadError::NamesExhausted(_) | UploadError::IoError(_) | UploadError::ConfigError(_) => {
                AppError::Storage(err.to_string())
            }
        }
    }
}
