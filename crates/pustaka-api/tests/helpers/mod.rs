//! Test helpers: build the router over the in-memory catalog and a temporary upload root.
//!
//! Run from workspace root: `cargo test -p pustaka-api`.

#![allow(dead_code)]

use std::path::PathBuf;

use axum_test::multipart::{MultipartForm, Part};
use axum::Router;
use axum_test::TestServer;
use pustaka_api::setup::routes;
use pustaka_api::AppState;
use pustaka_core::{Config, DatabaseBackend};
use pustaka_db::Catalog;
use pustaka_storage::create_upload_store;
use serde_json::Value;
use tempfile::TempDir;

/// Upload ceiling used by the tests, kept small so oversize bodies stay cheap.
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Test application: server plus the resources it owns.
pub struct TestApp {
    pub server: TestServer,
    /// The same router, for requests that need full control over headers and body.
    pub router: Router,
    pub catalog: Catalog,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names of the files currently in the upload root, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir.path())
            .expect("read upload dir")
            .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Filesystem location behind a `/uploads/...` reference path.
    pub fn path_of(&self, reference_path: &str) -> PathBuf {
        let name = reference_path
            .rsplit('/')
            .next()
            .expect("reference path has a file name");
        self.upload_dir.path().join(name)
    }

    pub async fn create_category(&self, name: &str) -> i64 {
        let response = self
            .server
            .post("/categories")
            .json(&serde_json::json!({ "name": name }))
            .await;
        assert_eq!(response.status_code(), 201);
        let body: Value = response.json();
        body["data"]["id"].as_i64().expect("category id")
    }

    /// Create a book through the API and return its `data` object.
    pub async fn create_book(&self, title: &str, category_id: i64) -> Value {
        let form = book_form(title, category_id).add_part("image", png_part("cover.png"));
        let response = self.server.post("/books").multipart(form).await;
        assert_eq!(response.status_code(), 201, "{}", response.text());
        let body: Value = response.json();
        body["data"].clone()
    }
}

/// Every text field of a valid book form.
pub fn book_form(title: &str, category_id: i64) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", title.to_string())
        .add_text("author", "Leila S. Chudori")
        .add_text("publicationDate", "2017-10-19")
        .add_text("publisher", "KPG")
        .add_text("pages", "390")
        .add_text("categoryId", category_id.to_string())
}

/// Bytes that start like a PNG. The store only checks the declared type.
pub fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(b"pustaka test cover");
    data
}

pub fn png_part(file_name: &str) -> Part {
    Part::bytes(bytes::Bytes::from(png_bytes()))
        .file_name(file_name.to_string())
        .mime_type("image/png")
}

pub fn test_config(upload_dir: &TempDir) -> Config {
    let mut config = Config::from_lookup(|_| None).expect("default config");
    config.database_backend = DatabaseBackend::Memory;
    config.upload.dir = upload_dir.path().to_path_buf();
    config.upload.max_size_bytes = TEST_MAX_UPLOAD_BYTES;
    config
}

/// Router over an empty in-memory catalog.
pub async fn setup_test_app() -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = test_config(&upload_dir);

    let catalog = Catalog::memory();
    let uploads = create_upload_store(&config.upload)
        .await
        .expect("Failed to create upload store");
    let state = AppState::new(catalog.clone(), uploads, config.clone());

    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server =
        TestServer::new(app.clone().into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        router: app,
        catalog,
        upload_dir,
    }
}
