//! Database repositories for data access layer
//!
//! Repositories are exposed through narrow traits so the HTTP layer can run against
//! PostgreSQL or the in-memory engine. Each repository owns one table.

pub mod book;
pub mod category;
pub mod list_query;
pub mod memory;
pub mod repository;
pub mod schema;
pub mod seed;

pub use book::PostgresBookRepository;
pub use category::PostgresCategoryRepository;
pub use memory::MemoryCatalog;
pub use repository::{BookRepository, Catalog, CategoryRepository};

use pustaka_core::AppError;

/// Translate constraint violations on write paths into client-facing errors.
pub(crate) fn map_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return duplicate_category_name();
        }
        if db_err.is_foreign_key_violation() {
            return unknown_category();
        }
    }
    err.into()
}

pub(crate) fn duplicate_category_name() -> AppError {
    AppError::Conflict("name sudah digunakan".to_string())
}

pub(crate) fn unknown_category() -> AppError {
    AppError::field("categoryId", "Kategori tidak ditemukan")
}
