use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{parse_id, ApiResponse};
use crate::state::AppState;
use crate::utils::upload::{discard_image, read_book_submission};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pustaka_core::models::{Book, BookListResponse};
use pustaka_core::validation::BookForm;
use pustaka_core::AppError;
use pustaka_db::BookListQuery;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

const IMAGE_REQUIRED: &str = "Field 'image' wajib diupload (multipart/form-data).";

/// Multipart body of book create and update. On update every part is optional.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)] // documentation only; parsed by `read_book_submission`
pub struct BookMultipartForm {
    title: String,
    author: String,
    /// `YYYY-MM-DD`
    publication_date: String,
    publisher: String,
    pages: String,
    category_id: String,
    /// JPG, PNG or WEBP cover image
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(
        ("draw" = Option<i64>, Query, description = "Echo counter, default 1"),
        ("start" = Option<i64>, Query, description = "Row offset, default 0"),
        ("length" = Option<i64>, Query, description = "Page length, default 10, capped"),
        ("search[value]" = Option<String>, Query, description = "Substring of title, author or publisher"),
        ("order[0][column]" = Option<usize>, Query, description = "Index into columns[i][data]"),
        ("order[0][dir]" = Option<String>, Query, description = "asc or desc"),
        ("categoryId" = Option<i32>, Query, description = "Only books of this category"),
        ("pubDateFrom" = Option<String>, Query, description = "Inclusive lower publication date"),
        ("pubDateTo" = Option<String>, Query, description = "Inclusive upper publication date")
    ),
    responses(
        (status = 200, description = "One page of the book grid", body = BookListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, params), fields(operation = "list_books"))]
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let query = BookListQuery::from_params(&params, &state.config.catalog);
    let page = state.catalog.books.list(&query).await?;

    tracing::debug!(
        rows = page.rows.len(),
        filtered = page.filtered_count,
        total = page.total_count,
        "Book page loaded"
    );

    Ok(Json(BookListResponse::new(query.draw, page)))
}

#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book, wrapped as {ok, data}", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_id(&id)?;
    let book = state
        .catalog
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(ApiResponse::data(book)))
}

#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body(content = BookMultipartForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Book created, wrapped as {ok, data}", body = Book),
        (status = 400, description = "Invalid fields, missing image or unsupported image type", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse),
        (status = 415, description = "Body is not multipart", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "create_book"))]
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let submission = read_book_submission(multipart?, state.config.upload.max_size_mb()).await?;

    // Fields are checked before the image so one response reports every field error.
    let mut input = BookForm::for_create(submission.fields).into_input(String::new())?;
    let image = submission
        .image
        .ok_or_else(|| AppError::InvalidInput(IMAGE_REQUIRED.to_string()))?;

    let stored = state.uploads.save(image).await?;
    input.image_url = stored.reference_path;

    match state.catalog.books.create(&input).await {
        Ok(book) => {
            tracing::info!(book_id = book.id, image = %book.image_url, "Book created");
            Ok((StatusCode::CREATED, Json(ApiResponse::data(book))))
        }
        Err(e) => {
            discard_image(state.uploads.as_ref(), &input.image_url, "book_create_failed").await;
            Err(e.into())
        }
    }
}

#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body(content = BookMultipartForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Book updated, wrapped as {ok, data}", body = Book),
        (status = 400, description = "Invalid fields or unsupported image type", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "update_book"))]
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_id(&id)?;
    let existing = state
        .catalog
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(AppError::not_found)?;

    let submission = read_book_submission(multipart?, state.config.upload.max_size_mb()).await?;
    let mut input =
        BookForm::for_update(&existing, submission.fields).into_input(existing.image_url.clone())?;

    let replaced = match submission.image {
        Some(image) => {
            input.image_url = state.uploads.save(image).await?.reference_path;
            true
        }
        None => false,
    };

    let outcome = state
        .catalog
        .books
        .update(id, &input)
        .await
        .and_then(|book| book.ok_or_else(AppError::not_found));

    match outcome {
        Ok(book) => {
            if replaced {
                discard_image(state.uploads.as_ref(), &existing.image_url, "book_image_replaced")
                    .await;
            }
            tracing::info!(book_id = book.id, replaced_image = replaced, "Book updated");
            Ok(Json(ApiResponse::data(book)))
        }
        Err(e) => {
            if replaced {
                discard_image(state.uploads.as_ref(), &input.image_url, "book_update_failed").await;
            }
            Err(e.into())
        }
    }
}

#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_book"))]
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_id(&id)?;
    let book: Book = state
        .catalog
        .books
        .destroy(id)
        .await?
        .ok_or_else(AppError::not_found)?;

    tracing::info!(book_id = book.id, "Book deleted");
    discard_image(state.uploads.as_ref(), &book.image_url, "book_deleted").await;

    Ok(Json(ApiResponse::done()))
}
