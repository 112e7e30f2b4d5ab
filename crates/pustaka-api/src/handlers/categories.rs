use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{parse_id, ApiResponse};
use crate::state::AppState;
use crate::utils::upload::discard_image;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pustaka_core::models::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use pustaka_core::AppError;
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories ordered by name", body = Vec<Category>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let categories = state.catalog.categories.find_all().await?;
    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created, wrapped as {ok, data}", body = Category),
        (status = 400, description = "Missing or too long name", body = ErrorResponse),
        (status = 409, description = "Name already used", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_category"))]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = request.normalized();
    request.validate()?;

    let category = state.catalog.categories.create(&request.name).await?;
    tracing::info!(category_id = category.id, "Category created");

    Ok((StatusCode::CREATED, Json(ApiResponse::data(category))))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category, wrapped as {ok, data}", body = Category),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_id(&id)?;
    let category = state
        .catalog
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(ApiResponse::data(category)))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated, wrapped as {ok, data}", body = Category),
        (status = 400, description = "Blank or too long name", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Name already used", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "update_category"))]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_id(&id)?;
    let request = request.normalized();
    request.validate()?;

    let category = match request.name {
        Some(name) => state.catalog.categories.update(id, &name).await?,
        // nothing to change
        None => state.catalog.categories.find_by_id(id).await?,
    }
    .ok_or_else(AppError::not_found)?;

    Ok(Json(ApiResponse::data(category)))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category and its books deleted"),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_category"))]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_id(&id)?;
    let cascaded_images = state
        .catalog
        .categories
        .destroy(id)
        .await?
        .ok_or_else(AppError::not_found)?;

    tracing::info!(
        category_id = id,
        cascaded_books = cascaded_images.len(),
        "Category deleted"
    );

    for reference_path in &cascaded_images {
        discard_image(state.uploads.as_ref(), reference_path, "category_deleted").await;
    }

    Ok(Json(ApiResponse::done()))
}
