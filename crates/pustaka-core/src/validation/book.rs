//! Book form validation.
//!
//! Multipart submissions arrive as loose strings. [`BookFields`] carries whatever the
//! client sent, [`BookForm`] is the complete set of values after merging with the stored
//! row (on update), and [`BookForm::into_input`] yields typed values or field errors.

use chrono::NaiveDate;
use validator::{Validate, ValidationError};

use super::failure;
use crate::error::AppError;
use crate::models::{Book, BookInput};

/// Text fields of a book submission as received; `None` means the field was omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publication_date: Option<String>,
    pub publisher: Option<String>,
    pub pages: Option<String>,
    pub category_id: Option<String>,
}

impl BookFields {
    /// Record a named form field. Returns `false` for names that are not book fields.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "author" => &mut self.author,
            "publicationDate" => &mut self.publication_date,
            "publisher" => &mut self.publisher,
            "pages" => &mut self.pages,
            "categoryId" => &mut self.category_id,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct BookForm {
    #[validate(length(min = 1, max = 255, message = "Wajib diisi, maksimal 255 karakter"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Wajib diisi, maksimal 255 karakter"))]
    pub author: String,
    #[validate(custom(function = "calendar_date"))]
    pub publication_date: String,
    #[validate(length(min = 1, max = 255, message = "Wajib diisi, maksimal 255 karakter"))]
    pub publisher: String,
    #[validate(custom(function = "positive_integer"))]
    pub pages: String,
    #[validate(custom(function = "positive_integer"))]
    pub category_id: String,
}

impl BookForm {
    /// Form for a new book: omitted fields are empty and fail validation.
    pub fn for_create(fields: BookFields) -> Self {
        Self {
            title: fields.title.unwrap_or_default(),
            author: fields.author.unwrap_or_default(),
            publication_date: fields.publication_date.unwrap_or_default(),
            publisher: fields.publisher.unwrap_or_default(),
            pages: fields.pages.unwrap_or_default(),
            category_id: fields.category_id.unwrap_or_default(),
        }
        .trimmed()
    }

    /// Form for a partial update: omitted fields keep the stored values.
    pub fn for_update(existing: &Book, fields: BookFields) -> Self {
        Self {
            title: fields.title.unwrap_or_else(|| existing.title.clone()),
            author: fields.author.unwrap_or_else(|| existing.author.clone()),
            publication_date: fields
                .publication_date
                .unwrap_or_else(|| existing.publication_date.format("%Y-%m-%d").to_string()),
            publisher: fields.publisher.unwrap_or_else(|| existing.publisher.clone()),
            pages: fields.pages.unwrap_or_else(|| existing.pages.to_string()),
            category_id: fields
                .category_id
                .unwrap_or_else(|| existing.category_id.to_string()),
        }
        .trimmed()
    }

    fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            publication_date: self.publication_date.trim().to_string(),
            publisher: self.publisher.trim().to_string(),
            pages: self.pages.trim().to_string(),
            category_id: self.category_id.trim().to_string(),
        }
    }

    /// Validate every field at once and convert to typed values.
    pub fn into_input(self, image_url: String) -> Result<BookInput, AppError> {
        self.validate()?;
        Ok(BookInput {
            publication_date: parse_date(&self.publication_date)
                .ok_or_else(|| AppError::field("publicationDate", DATE_MESSAGE))?,
            pages: parse_positive(&self.pages)
                .ok_or_else(|| AppError::field("pages", POSITIVE_MESSAGE))?,
            category_id: parse_positive(&self.category_id)
                .ok_or_else(|| AppError::field("categoryId", POSITIVE_MESSAGE))?,
            title: self.title,
            author: self.author,
            publisher: self.publisher,
            image_url,
        })
    }
}

const DATE_MESSAGE: &str = "Format tanggal harus YYYY-MM-DD";
const POSITIVE_MESSAGE: &str = "Harus berupa bilangan bulat positif";

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn parse_positive(value: &str) -> Option<i32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<i32>().ok().filter(|n| *n > 0)
}

fn calendar_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| failure("date", DATE_MESSAGE))
}

fn positive_integer(value: &str) -> Result<(), ValidationError> {
    parse_positive(value)
        .map(|_| ())
        .ok_or_else(|| failure("positive_integer", POSITIVE_MESSAGE))
}
