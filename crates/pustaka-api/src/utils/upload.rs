//! Multipart parsing and best-effort cleanup for book cover uploads

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use http_body_util::LengthLimitError;
use pustaka_core::validation::BookFields;
use pustaka_core::AppError;
use pustaka_storage::{UploadFile, UploadStore};

/// Form field carrying the cover image.
pub const IMAGE_FIELD: &str = "image";

/// A book form as submitted: text fields plus the cover image, if one was sent.
#[derive(Debug, Default)]
pub struct BookSubmission {
    pub fields: BookFields,
    /// `None` when the image part is absent or empty.
    pub image: Option<UploadFile>,
}

/// Read every part of a book form.
///
/// Unknown parts are skipped. An image part with no bytes counts as no image, so a form
/// that keeps its file input empty leaves the current cover alone.
pub async fn read_book_submission(
    mut multipart: Multipart,
    max_upload_mb: usize,
) -> Result<BookSubmission, AppError> {
    let mut submission = BookSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_mb))?
    {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, max_upload_mb))?;

            submission.image = (!data.is_empty()).then(|| UploadFile {
                name: file_name,
                content_type,
                data,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| multipart_error(e, max_upload_mb))?;
        if !submission.fields.set(&name, value) {
            tracing::debug!(field = %name, "Ignoring unknown form field");
        }
    }

    Ok(submission)
}

fn multipart_error(err: MultipartError, max_upload_mb: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE || exceeded_body_limit(&err) {
        return AppError::too_large(
            IMAGE_FIELD,
            format!("Ukuran gambar maksimal {}MB.", max_upload_mb),
        );
    }
    AppError::InvalidInput(format!("Gagal membaca multipart: {}", err.body_text()))
}

/// Whether the body limit cut the stream, however deeply the limit error is wrapped.
fn exceeded_body_limit(err: &MultipartError) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return true;
        }
        source = current.source();
    }
    false
}

/// Delete a stored image, logging instead of failing.
pub async fn discard_image(store: &dyn UploadStore, reference_path: &str, reason: &'static str) {
    match store.delete_by_reference(reference_path).await {
        Ok(removed) => {
            tracing::debug!(reference_path, removed, reason, "Image cleanup finished");
        }
        Err(e) => {
            tracing::warn!(error = %e, reference_path, reason, "Image cleanup failed");
        }
    }
}
