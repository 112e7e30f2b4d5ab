//! Repository traits and the catalog handle shared by both storage engines.

use std::sync::Arc;

use async_trait::async_trait;
use pustaka_core::models::{Book, BookInput, BookListPage, Category};
use pustaka_core::AppError;
use sqlx::PgPool;

use super::list_query::BookListQuery;
use super::memory::MemoryCatalog;
use super::{PostgresBookRepository, PostgresCategoryRepository};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name ascending.
    async fn find_all(&self) -> Result<Vec<Category>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, AppError>;

    /// Fails with `Conflict` when the name is taken.
    async fn create(&self, name: &str) -> Result<Category, AppError>;

    /// `None` when the category does not exist.
    async fn update(&self, id: i32, name: &str) -> Result<Option<Category>, AppError>;

    /// Delete a category together with its books.
    ///
    /// Returns the image references of the books removed by the cascade, or `None` when
    /// the category does not exist.
    async fn destroy(&self, id: i32) -> Result<Option<Vec<String>>, AppError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    /// One page of the book grid plus total and filtered counts.
    async fn list(&self, query: &BookListQuery) -> Result<BookListPage, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, AppError>;

    /// Fails with a `categoryId` validation error when the category does not exist.
    async fn create(&self, input: &BookInput) -> Result<Book, AppError>;

    /// Replace every column of an existing book. `None` when the book does not exist.
    async fn update(&self, id: i32, input: &BookInput) -> Result<Option<Book>, AppError>;

    /// Delete a book, returning the removed row.
    async fn destroy(&self, id: i32) -> Result<Option<Book>, AppError>;
}

#[derive(Clone)]
enum Engine {
    Postgres(PgPool),
    Memory,
}

/// Repositories for one storage engine, plus engine-level health and shutdown.
#[derive(Clone)]
pub struct Catalog {
    pub categories: Arc<dyn CategoryRepository>,
    pub books: Arc<dyn BookRepository>,
    engine: Engine,
}

impl Catalog {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            categories: Arc::new(PostgresCategoryRepository::new(pool.clone())),
            books: Arc::new(PostgresBookRepository::new(pool.clone())),
            engine: Engine::Postgres(pool),
        }
    }

    /// Empty in-process catalog. Contents are lost when the process exits.
    pub fn memory() -> Self {
        let store = MemoryCatalog::new();
        Self {
            categories: Arc::new(store.clone()),
            books: Arc::new(store),
            engine: Engine::Memory,
        }
    }

    pub fn engine_name(&self) -> &'static str {
        match self.engine {
            Engine::Postgres(_) => "postgres",
            Engine::Memory => "memory",
        }
    }

    pub fn pool(&self) -> Option<&PgPool> {
        match &self.engine {
            Engine::Postgres(pool) => Some(pool),
            Engine::Memory => None,
        }
    }

    /// Round-trip to the database.
    #[tracing::instrument(skip(self), fields(db.operation = "ping"))]
    pub async fn ping(&self) -> Result<(), AppError> {
        match &self.engine {
            Engine::Postgres(pool) => {
                sqlx::query_scalar::<_, i32>("SELECT 1")
                    .fetch_one(pool)
                    .await?;
                Ok(())
            }
            Engine::Memory => Ok(()),
        }
    }

    /// Close the connection pool, waiting for checked-out connections.
    pub async fn close(&self) {
        if let Engine::Postgres(pool) = &self.engine {
            pool.close().await;
            tracing::info!("Database pool closed");
        }
    }
}
