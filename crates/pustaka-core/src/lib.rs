//! Pustaka Core Library
//!
//! This crate provides core domain models, error types, configuration, and validation
//! that are shared across all Pustaka components.

pub mod config;
pub mod constants;
pub mod database_types;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{CatalogConfig, Config, UploadConfig};
pub use database_types::DatabaseBackend;
pub use error::{AppError, ErrorMetadata, FieldError, LogLevel};
