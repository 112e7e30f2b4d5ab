//! Shared constants

/// Upload size ceiling in megabytes.
pub const MAX_UPLOAD_SIZE_MB: usize = 5;

/// MIME types accepted for book cover uploads.
pub const DEFAULT_UPLOAD_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Uploads are grouped by the calendar day in this zone.
pub const DEFAULT_UPLOAD_TIMEZONE: &str = "Asia/Jakarta";

pub const DEFAULT_UPLOAD_DIR: &str = "public/uploads";

pub const DEFAULT_UPLOAD_PUBLIC_PREFIX: &str = "/uploads";

/// Page length used by the book list when the client sends none or garbage.
pub const DEFAULT_PAGE_LENGTH: i64 = 10;

pub const MAX_PAGE_LENGTH: i64 = 100;

/// Display name for a list row whose category cannot be resolved.
pub const MISSING_CATEGORY_NAME: &str = "-";
