//! HTTP handlers for the catalog routes.

pub mod books;
pub mod categories;

use pustaka_core::AppError;
use serde::Serialize;

/// Success envelope: `{ok: true, data}`, or `{ok: true}` when there is nothing to return.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn done() -> Self {
        Self {
            ok: true,
            data: None,
        }
    }
}

/// Path ids that are not integers name no row, so they read as not found.
pub fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.trim().parse::<i32>().map_err(|_| AppError::not_found())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_not_found() {
        assert_eq!(parse_id("42").unwrap(), 42);
        for raw in ["abc", "", "1.5", "99999999999"] {
            assert!(matches!(parse_id(raw), Err(AppError::NotFound(_))));
        }
    }

    #[test]
    fn done_has_no_data_key() {
        let json = serde_json::to_value(ApiResponse::done()).unwrap();
        assert_eq!(json, serde_json::json!({ "ok": true }));
    }
}
