//! Pustaka Storage Library
//!
//! Cover image storage for the catalog. Files live in one flat uploads directory and are
//! referenced elsewhere only by their public path (`/uploads/<filename>`).
//!
//! # Filename format
//!
//! `<YYYY-MM-DD>-<slug>[-<n>]<ext>` where the date is the current calendar day in the
//! configured timezone, `slug` is derived from the client's original filename and `n`
//! is the first free collision suffix.

pub mod factory;
pub mod local;
pub mod naming;
pub mod traits;

// Re-export commonly used types
pub use factory::create_upload_store;
pub use local::LocalUploadStore;
pub use traits::{StoredUpload, UploadError, UploadFile, UploadResult, UploadStore};
