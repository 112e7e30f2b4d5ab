//! In-process catalog engine
//!
//! Mirrors the PostgreSQL schema rules: unique category names, books must reference an
//! existing category, and deleting a category cascades to its books.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pustaka_core::constants::MISSING_CATEGORY_NAME;
use pustaka_core::models::{Book, BookInput, BookListPage, BookListRow, Category};
use pustaka_core::AppError;
use tokio::sync::Mutex;

use super::list_query::BookListQuery;
use super::repository::{BookRepository, CategoryRepository};
use super::{duplicate_category_name, unknown_category};

#[derive(Default)]
struct State {
    categories: BTreeMap<i32, Category>,
    books: BTreeMap<i32, Book>,
    next_category_id: i32,
    next_book_id: i32,
}

impl State {
    fn name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }
}

/// Catalog held in memory behind a single lock.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    state: Arc<Mutex<State>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for MemoryCatalog {
    async fn find_all(&self) -> Result<Vec<Category>, AppError> {
        let state = self.state.lock().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, AppError> {
        Ok(self.state.lock().await.categories.get(&id).cloned())
    }

    async fn create(&self, name: &str) -> Result<Category, AppError> {
        let mut state = self.state.lock().await;
        if state.name_taken(name, None) {
            return Err(duplicate_category_name());
        }

        state.next_category_id += 1;
        let now = Utc::now();
        let category = Category {
            id: state.next_category_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: i32, name: &str) -> Result<Option<Category>, AppError> {
        let mut state = self.state.lock().await;
        if !state.categories.contains_key(&id) {
            return Ok(None);
        }
        if state.name_taken(name, Some(id)) {
            return Err(duplicate_category_name());
        }

        let Some(category) = state.categories.get_mut(&id) else {
            return Ok(None);
        };
        category.name = name.to_string();
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn destroy(&self, id: i32) -> Result<Option<Vec<String>>, AppError> {
        let mut state = self.state.lock().await;
        if state.categories.remove(&id).is_none() {
            return Ok(None);
        }

        let mut image_urls = Vec::new();
        state.books.retain(|_, book| {
            if book.category_id == id {
                image_urls.push(book.image_url.clone());
                false
            } else {
                true
            }
        });
        Ok(Some(image_urls))
    }
}

#[async_trait]
impl BookRepository for MemoryCatalog {
    async fn list(&self, query: &BookListQuery) -> Result<BookListPage, AppError> {
        let state = self.state.lock().await;

        let mut matching: Vec<&Book> = state.books.values().filter(|b| query.matches(b)).collect();
        matching.sort_by(|a, b| query.compare(a, b));

        let rows = matching
            .iter()
            .skip(query.offset())
            .take(query.limit())
            .map(|book| BookListRow {
                id: book.id,
                title: book.title.clone(),
                author: book.author.clone(),
                publisher: book.publisher.clone(),
                publication_date: book.publication_date,
                pages: book.pages,
                category_id: book.category_id,
                category_name: state
                    .categories
                    .get(&book.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| MISSING_CATEGORY_NAME.to_string()),
                image_url: book.image_url.clone(),
            })
            .collect();

        Ok(BookListPage {
            rows,
            total_count: state.books.len() as i64,
            filtered_count: matching.len() as i64,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, AppError> {
        Ok(self.state.lock().await.books.get(&id).cloned())
    }

    async fn create(&self, input: &BookInput) -> Result<Book, AppError> {
        let mut state = self.state.lock().await;
        if !state.categories.contains_key(&input.category_id) {
            return Err(unknown_category());
        }

        state.next_book_id += 1;
        let now = Utc::now();
        let book = Book {
            id: state.next_book_id,
            title: input.title.clone(),
            author: input.author.clone(),
            publication_date: input.publication_date,
            publisher: input.publisher.clone(),
            pages: input.pages,
            category_id: input.category_id,
            image_url: input.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        state.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i32, input: &BookInput) -> Result<Option<Book>, AppError> {
        let mut state = self.state.lock().await;
        if !state.books.contains_key(&id) {
            return Ok(None);
        }
        if !state.categories.contains_key(&input.category_id) {
            return Err(unknown_category());
        }

        let Some(book) = state.books.get_mut(&id) else {
            return Ok(None);
        };
        book.title = input.title.clone();
        book.author = input.author.clone();
        book.publication_date = input.publication_date;
        book.publisher = input.publisher.clone();
        book.pages = input.pages;
        book.category_id = input.category_id;
        book.image_url = input.image_url.clone();
        book.updated_at = Utc::now();
        Ok(Some(book.clone()))
    }

    async fn destroy(&self, id: i32) -> Result<Option<Book>, AppError> {
        Ok(self.state.lock().await.books.remove(&id))
    }
}
