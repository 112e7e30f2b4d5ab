use async_trait::async_trait;
use pustaka_core::models::{Book, BookInput, BookListPage, BookListRow};
use pustaka_core::AppError;
use sqlx::{PgPool, Postgres};

use super::list_query::{BookListQuery, FilterArg};
use super::map_write_error;
use super::repository::BookRepository;

const BOOK_COLUMNS: &str = "id, title, author, publication_date, publisher, pages, category_id, image_url, created_at, updated_at";

/// Repository for managing books
#[derive(Clone)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    #[tracing::instrument(skip(self, query), fields(db.table = "books", db.operation = "select", sort = ?query.sort, start = query.start, length = query.length))]
    async fn list(&self, query: &BookListQuery) -> Result<BookListPage, AppError> {
        let total_count = sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        let (where_sql, args) = query.where_sql();

        let count_sql = format!("SELECT COUNT(*) FROM books b {}", where_sql);
        let mut count_query = sqlx::query_scalar::<Postgres, i64>(&count_sql);
        for arg in &args {
            count_query = match arg {
                FilterArg::Int(v) => count_query.bind(*v),
                FilterArg::Date(v) => count_query.bind(*v),
                FilterArg::Text(v) => count_query.bind(v.clone()),
            };
        }
        let filtered_count = count_query.fetch_one(&self.pool).await?;

        let param_index = args.len() + 1;
        let rows_sql = format!(
            r#"
            SELECT b.id, b.title, b.author, b.publisher, b.publication_date, b.pages,
                   b.category_id, COALESCE(c.name, '-') AS category_name, b.image_url
            FROM books b
            LEFT JOIN categories c ON c.id = b.category_id
            {}
            {}
            LIMIT ${} OFFSET ${}
            "#,
            where_sql,
            query.order_sql(),
            param_index,
            param_index + 1
        );
        let mut rows_query = sqlx::query_as::<Postgres, BookListRow>(&rows_sql);
        for arg in &args {
            rows_query = match arg {
                FilterArg::Int(v) => rows_query.bind(*v),
                FilterArg::Date(v) => rows_query.bind(*v),
                FilterArg::Text(v) => rows_query.bind(v.clone()),
            };
        }
        let rows = rows_query
            .bind(query.length)
            .bind(query.start)
            .fetch_all(&self.pool)
            .await?;

        Ok(BookListPage {
            rows,
            total_count,
            filtered_count,
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "select", db.record_id = id))]
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<Postgres, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    #[tracing::instrument(skip(self, input), fields(db.table = "books", db.operation = "insert", category_id = input.category_id))]
    async fn create(&self, input: &BookInput) -> Result<Book, AppError> {
        let book = sqlx::query_as::<Postgres, Book>(&format!(
            r#"
            INSERT INTO books (title, author, publication_date, publisher, pages, category_id, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&input.title)
        .bind(&input.author)
        .bind(input.publication_date)
        .bind(&input.publisher)
        .bind(input.pages)
        .bind(input.category_id)
        .bind(&input.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(book)
    }

    #[tracing::instrument(skip(self, input), fields(db.table = "books", db.operation = "update", db.record_id = id))]
    async fn update(&self, id: i32, input: &BookInput) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<Postgres, Book>(&format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, publication_date = $4, publisher = $5,
                pages = $6, category_id = $7, image_url = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.author)
        .bind(input.publication_date)
        .bind(&input.publisher)
        .bind(input.pages)
        .bind(input.category_id)
        .bind(&input.image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(book)
    }

    #[tracing::instrument(skip(self), fields(db.table = "books", db.operation = "delete", db.record_id = id))]
    async fn destroy(&self, id: i32) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<Postgres, Book>(&format!(
            "DELETE FROM books WHERE id = $1 RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }
}
