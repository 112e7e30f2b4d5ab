//! Data models for the catalog
//!
//! Persisted rows, request DTOs and list responses, grouped by entity.

mod book;
mod category;

pub use book::*;
pub use category::*;
