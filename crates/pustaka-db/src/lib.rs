//! Pustaka Database Layer
//!
//! This crate provides the category and book repositories, the book list query
//! builder, an in-memory engine with the same semantics, and sample seed data.

// Module declarations
pub mod db;

// Re-exports: repository traits and the catalog handle
pub use db::{BookRepository, Catalog, CategoryRepository};

// Re-exports: PostgreSQL repositories
pub use db::{PostgresBookRepository, PostgresCategoryRepository};

// Re-exports: in-memory engine
pub use db::MemoryCatalog;

// Re-exports: list query builder
pub use db::list_query::{BookListQuery, SortColumn, SortDirection};

// Re-exports: migrations
pub use db::schema::run_migrations;

// Re-exports: seed data
pub use db::seed::{seed_catalog, SeedReport};
