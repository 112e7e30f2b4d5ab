//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use pustaka_core::{models, FieldError};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pustaka API",
        version = "0.1.0",
        description = "Library catalog administration: categories, books with cover images, and the server-side book grid."
    ),
    paths(
        // Categories
        handlers::categories::list_categories,
        handlers::categories::create_category,
        handlers::categories::get_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,
        // Books
        handlers::books::list_books,
        handlers::books::create_book,
        handlers::books::get_book,
        handlers::books::update_book,
        handlers::books::delete_book,
        // Health
        health::liveness_check,
        health::readiness_check,
    ),
    components(
        schemas(
            models::Category,
            models::CreateCategoryRequest,
            models::UpdateCategoryRequest,
            models::Book,
            models::BookListRow,
            models::BookListResponse,
            handlers::books::BookMultipartForm,
            error::ErrorResponse,
            FieldError,
        )
    ),
    tags(
        (name = "categories", description = "Book categories"),
        (name = "books", description = "Books and their cover images"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_catalog_path() {
        let spec = ApiDoc::openapi();
        for path in [
            "/categories",
            "/categories/{id}",
            "/books",
            "/books/{id}",
            "/health",
            "/ready",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
