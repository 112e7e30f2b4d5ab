//! Validation modules

mod book;

use std::borrow::Cow;

use validator::ValidationError;

pub use book::{BookFields, BookForm};

/// Convert a Rust field name to the camelCase name clients send (`category_id` -> `categoryId`).
pub fn wire_field_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

pub(crate) fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Category names must contain something besides whitespace.
pub fn name_present(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(failure("required", "name wajib"));
    }
    Ok(())
}
