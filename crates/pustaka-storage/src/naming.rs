//! Filename derivation for stored uploads.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::traits::{UploadError, UploadResult};

const FALLBACK_BASENAME: &str = "image";
const FALLBACK_EXTENSION: &str = ".jpg";

/// Lower-cased MIME type without parameters (`image/PNG; q=1` -> `image/png`).
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Calendar day of `now` in `tz`, formatted `YYYY-MM-DD`.
pub fn date_prefix(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).format("%Y-%m-%d").to_string()
}

/// Last path component of a client-supplied name, accepting either separator.
fn last_component(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Compiled patterns used to turn client filenames into slugs.
#[derive(Debug, Clone)]
pub struct FilenameRules {
    final_extension: Regex,
    whitespace_run: Regex,
    outside_alphabet: Regex,
}

impl FilenameRules {
    pub fn new() -> UploadResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                UploadError::ConfigError(format!("Failed to compile filename pattern: {}", e))
            })
        };
        Ok(Self {
            final_extension: compile(r"\.[^/.]+$")?,
            whitespace_run: compile(r"\s+")?,
            outside_alphabet: compile(r"[^a-z0-9\-_]")?,
        })
    }

    /// URL- and filesystem-safe base name derived from the original filename.
    pub fn slug_basename(&self, original_name: &str) -> String {
        let name = last_component(original_name);
        let stem = self.final_extension.replace(name, "");
        let lowered = stem.trim().to_lowercase();
        let dashed = self.whitespace_run.replace_all(&lowered, "-");
        let slug = self.outside_alphabet.replace_all(&dashed, "");
        if slug.is_empty() {
            FALLBACK_BASENAME.to_string()
        } else {
            slug.into_owned()
        }
    }
}

/// Lower-cased extension with its leading dot, or `.jpg` when there is no usable one.
pub fn extension(original_name: &str) -> String {
    let name = last_component(original_name);
    match name.rfind('.') {
        Some(idx) if idx > 0 => {
            let ext = &name[idx + 1..];
            if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                format!(".{}", ext.to_ascii_lowercase())
            } else {
                FALLBACK_EXTENSION.to_string()
            }
        }
        _ => FALLBACK_EXTENSION.to_string(),
    }
}

/// Candidate filename for attempt `n`; attempt 0 carries no suffix.
pub fn candidate_filename(prefix: &str, base: &str, ext: &str, n: u32) -> String {
    if n == 0 {
        format!("{}-{}{}", prefix, base, ext)
    } else {
        format!("{}-{}-{}{}", prefix, base, n, ext)
    }
}

/// Short label for a MIME type in client messages (`image/jpeg` -> `JPG`).
pub fn mime_label(mime: &str) -> String {
    match mime {
        "image/jpeg" | "image/jpg" => "JPG".to_string(),
        other => other
            .rsplit('/')
            .next()
            .unwrap_or(other)
            .to_ascii_uppercase(),
    }
}
