use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Book row as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    #[schema(value_type = String, format = Date, example = "2017-10-19")]
    pub publication_date: NaiveDate,
    pub publisher: String,
    pub pages: i32,
    pub category_id: i32,
    /// Public reference path of the cover image, e.g. `/uploads/2026-02-19-laut-bercerita.jpg`.
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated values written on create and on (merged) update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub publication_date: NaiveDate,
    pub publisher: String,
    pub pages: i32,
    pub category_id: i32,
    pub image_url: String,
}

/// One row of the paginated book grid, joined with its category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct BookListRow {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub publisher: String,
    #[schema(value_type = String, format = Date)]
    pub publication_date: NaiveDate,
    pub pages: i32,
    pub category_id: i32,
    /// `-` when the category cannot be resolved.
    pub category_name: String,
    pub image_url: String,
}

/// Result of a list query before it is framed for the grid.
#[derive(Debug, Clone, Default)]
pub struct BookListPage {
    pub rows: Vec<BookListRow>,
    /// Count of all books, ignoring filters.
    pub total_count: i64,
    /// Count of books matching the filter predicate.
    pub filtered_count: i64,
}

/// Response body of `GET /books`, in the shape the data-grid widget expects.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookListResponse {
    pub draw: i64,
    pub records_total: i64,
    pub records_filtered: i64,
    pub data: Vec<BookListRow>,
}

impl BookListResponse {
    pub fn new(draw: i64, page: BookListPage) -> Self {
        Self {
            draw,
            records_total: page.total_count,
            records_filtered: page.filtered_count,
            data: page.rows,
        }
    }
}
