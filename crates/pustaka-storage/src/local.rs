use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use pustaka_core::UploadConfig;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::naming::{self, FilenameRules};
use crate::traits::{StoredUpload, UploadError, UploadFile, UploadResult, UploadStore};

/// Upper bound on collision suffixes tried for one base name on one day.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Local filesystem upload store
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    root: PathBuf,
    public_prefix: String,
    max_size_bytes: usize,
    allowed_content_types: Vec<String>,
    timezone: Tz,
    rules: FilenameRules,
}

impl LocalUploadStore {
    /// Create a store rooted at `config.dir`, creating the directory when missing.
    pub async fn new(config: &UploadConfig) -> UploadResult<Self> {
        let root = config.dir.clone();

        fs::create_dir_all(&root).await.map_err(|e| {
            UploadError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalUploadStore {
            root,
            public_prefix: format!("/{}", config.public_prefix.trim_matches('/')),
            max_size_bytes: config.max_size_bytes,
            allowed_content_types: config.allowed_content_types.clone(),
            timezone: config.timezone,
            rules: FilenameRules::new()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn allowed_label(&self) -> String {
        let mut labels: Vec<String> = Vec::new();
        for label in self.allowed_content_types.iter().map(|m| naming::mime_label(m)) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels.join("/")
    }

    fn check(&self, file: &UploadFile) -> UploadResult<()> {
        let mime = naming::normalize_mime_type(&file.content_type);
        if !self.allowed_content_types.iter().any(|allowed| *allowed == mime) {
            return Err(UploadError::UnsupportedType {
                allowed: self.allowed_label(),
            });
        }

        if file.size() > self.max_size_bytes {
            return Err(UploadError::TooLarge {
                max_mb: self.max_size_bytes / (1024 * 1024),
            });
        }

        Ok(())
    }

    /// Open the first free candidate name exclusively.
    async fn claim(&self, prefix: &str, base: &str, ext: &str) -> UploadResult<(String, fs::File)> {
        for n in 0..MAX_NAME_ATTEMPTS {
            let filename = naming::candidate_filename(prefix, base, ext, n);
            let path = self.root.join(&filename);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((filename, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(UploadError::IoError(e)),
            }
        }

        Err(UploadError::NamesExhausted(format!(
            "{}-{}{}",
            prefix, base, ext
        )))
    }

    /// Save using `now` for the date prefix.
    pub async fn save_at(&self, file: UploadFile, now: DateTime<Utc>) -> UploadResult<StoredUpload> {
        self.check(&file)?;

        fs::create_dir_all(&self.root).await?;

        let prefix = naming::date_prefix(now, self.timezone);
        let base = self.rules.slug_basename(&file.name);
        let ext = naming::extension(&file.name);

        let start = std::time::Instant::now();
        let (filename, mut handle) = self.claim(&prefix, &base, &ext).await?;
        let path = self.root.join(&filename);

        let written = async {
            handle.write_all(&file.data).await?;
            handle.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(handle);
            if let Err(cleanup) = fs::remove_file(&path).await {
                tracing::warn!(
                    error = %cleanup,
                    path = %path.display(),
                    "Failed to remove partially written upload"
                );
            }
            return Err(UploadError::IoError(e));
        }

        let reference_path = format!("{}/{}", self.public_prefix, filename);

        tracing::info!(
            path = %path.display(),
            reference = %reference_path,
            size_bytes = file.size(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(StoredUpload {
            filename,
            reference_path,
        })
    }

    /// Resolve a reference path to a file inside the root, or `None` when it is not ours.
    fn reference_to_path(&self, reference_path: &str) -> Option<PathBuf> {
        let owned_prefix = format!("{}/", self.public_prefix);
        if !reference_path.starts_with(&owned_prefix) {
            return None;
        }

        let filename = Path::new(reference_path).file_name()?.to_str()?;
        if filename.is_empty() || filename == "." || filename == ".." {
            return None;
        }

        Some(self.root.join(filename))
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn save(&self, file: UploadFile) -> UploadResult<StoredUpload> {
        self.save_at(file, Utc::now()).await
    }

    async fn delete_by_reference(&self, reference_path: &str) -> UploadResult<bool> {
        let Some(path) = self.reference_to_path(reference_path) else {
            tracing::debug!(reference = %reference_path, "Reference outside upload prefix, nothing to delete");
            return Ok(false);
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), reference = %reference_path, "Upload deleted");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(UploadError::IoError(e)),
        }
    }

    fn public_prefix(&self) -> &str {
        &self.public_prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::TimeZone;
    use tempfile::TempDir;

    async fn store_in(dir: &TempDir) -> LocalUploadStore {
        let config = UploadConfig {
            dir: dir.path().join("uploads"),
            ..UploadConfig::default()
        };
        LocalUploadStore::new(&config).await.unwrap()
    }

    fn jpeg(name: &str, data: &'static [u8]) -> UploadFile {
        UploadFile {
            name: name.to_string(),
            content_type: "image/jpeg".to_string(),
            data: Bytes::from_static(data),
        }
    }

    fn noon_jakarta() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 19, 5, 0, 0).unwrap()
    }

    fn entries(store: &LocalUploadStore) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn stores_exact_bytes_at_reference_path() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let stored = store
            .save_at(jpeg("Laut Bercerita.JPG", b"cover-bytes"), noon_jakarta())
            .await
            .unwrap();

        assert_eq!(stored.filename, "2026-02-19-laut-bercerita.jpg");
        assert_eq!(stored.reference_path, "/uploads/2026-02-19-laut-bercerita.jpg");
        let on_disk = std::fs::read(store.root().join(&stored.filename)).unwrap();
        assert_eq!(on_disk, b"cover-bytes");
    }

    #[tokio::test]
    async fn same_name_same_day_gets_numbered_suffix() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let first = store.save_at(jpeg("cover.jpg", b"a"), noon_jakarta()).await.unwrap();
        let second = store.save_at(jpeg("cover.jpg", b"b"), noon_jakarta()).await.unwrap();
        let third = store.save_at(jpeg("cover.jpg", b"c"), noon_jakarta()).await.unwrap();

        assert_eq!(first.filename, "2026-02-19-cover.jpg");
        assert_eq!(second.filename, "2026-02-19-cover-1.jpg");
        assert_eq!(third.filename, "2026-02-19-cover-2.jpg");
        assert_eq!(std::fs::read(store.root().join(&second.filename)).unwrap(), b"b");
    }

    #[tokio::test]
    async fn concurrent_saves_never_share_a_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.save_at(jpeg("cover.jpg", b"x"), noon_jakarta()).await
            }));
        }

        let mut names = Vec::new();
        for handle in handles {
            names.push(handle.await.unwrap().unwrap().filename);
        }
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
        assert_eq!(entries(&store).len(), 8);
    }

    #[tokio::test]
    async fn disallowed_type_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let file = UploadFile {
            name: "cover.gif".to_string(),
            content_type: "image/gif".to_string(),
            data: Bytes::from_static(b"GIF89a"),
        };
        let err = store.save_at(file, noon_jakarta()).await.unwrap_err();

        assert!(matches!(err, UploadError::UnsupportedType { .. }));
        assert_eq!(err.to_string(), "Format gambar harus JPG/PNG/WEBP.");
        assert!(entries(&store).is_empty());
    }

    #[tokio::test]
    async fn mime_parameters_and_case_are_ignored() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;

        let file = UploadFile {
            name: "cover.png".to_string(),
            content_type: "IMAGE/PNG; charset=binary".to_string(),
            data: Bytes::from_static(b"png"),
        };
        assert!(store.save_at(file, noon_jakarta()).await.is_ok());
    }

    #[tokio::test]
    async fn oversize_payload_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = UploadConfig {
            dir: dir.path().join("uploads"),
            max_size_bytes: 4,
            ..UploadConfig::default()
        };
        let store = LocalUploadStore::new(&config).await.unwrap();

        let err = store
            .save_at(jpeg("cover.jpg", b"12345"), noon_jakarta())
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::TooLarge { .. }));
        assert!(entries(&store).is_empty());

        let ok = store.save_at(jpeg("cover.jpg", b"1234"), noon_jakarta()).await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn recreates_missing_root() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        std::fs::remove_dir_all(store.root()).unwrap();

        let stored = store.save_at(jpeg("a.jpg", b"a"), noon_jakarta()).await.unwrap();
        assert!(store.root().join(stored.filename).exists());
    }

    #[tokio::test]
    async fn delete_removes_owned_file_once() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let stored = store.save_at(jpeg("a.jpg", b"a"), noon_jakarta()).await.unwrap();

        assert!(store.delete_by_reference(&stored.reference_path).await.unwrap());
        assert!(!store.root().join(&stored.filename).exists());
        // already gone
        assert!(!store.delete_by_reference(&stored.reference_path).await.unwrap());
    }

    #[tokio::test]
    async fn delete_ignores_foreign_references() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let stored = store.save_at(jpeg("a.jpg", b"a"), noon_jakarta()).await.unwrap();

        let foreign = format!("https://cdn.example.com/uploads/{}", stored.filename);
        assert!(!store.delete_by_reference(&foreign).await.unwrap());
        assert!(!store.delete_by_reference("/static/a.jpg").await.unwrap());
        assert!(!store.delete_by_reference("").await.unwrap());
        assert!(store.root().join(&stored.filename).exists());
    }

    #[tokio::test]
    async fn delete_only_resolves_final_component() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let outside = dir.path().join("secret.txt");
        std::fs::write(&outside, b"keep").unwrap();

        assert!(!store
            .delete_by_reference("/uploads/../secret.txt")
            .await
            .unwrap());
        assert!(outside.exists());
    }
}
