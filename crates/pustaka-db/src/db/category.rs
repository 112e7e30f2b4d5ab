use async_trait::async_trait;
use pustaka_core::{models::Category, AppError};
use sqlx::{PgPool, Postgres};

use super::map_write_error;
use super::repository::CategoryRepository;

/// Repository for managing categories
#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "select"))]
    async fn find_all(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<Postgres, Category>(
            "SELECT id, name, created_at, updated_at FROM categories ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "select", db.record_id = id))]
    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<Postgres, Category>(
            "SELECT id, name, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "insert"))]
    async fn create(&self, name: &str) -> Result<Category, AppError> {
        let category = sqlx::query_as::<Postgres, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "update", db.record_id = id))]
    async fn update(&self, id: i32, name: &str) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<Postgres, Category>(
            r#"
            UPDATE categories
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "delete", db.record_id = id))]
    async fn destroy(&self, id: i32) -> Result<Option<Vec<String>>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the books the cascade is about to remove so the returned references match.
        let image_urls = sqlx::query_scalar::<Postgres, String>(
            "SELECT image_url FROM books WHERE category_id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;

        tracing::debug!(
            category_id = id,
            cascaded_books = image_urls.len(),
            "Category deleted"
        );

        Ok(Some(image_urls))
    }
}
