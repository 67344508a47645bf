//! File storage engine.
//!
//! Uploaded files land under a date-partitioned tree
//! (`{root}/{year}/{month}/{millis}-{sanitized-name}`). All path
//! construction happens here, server-side — callers never supply a path
//! component for writes, which is what keeps directory traversal off the
//! table. Public URLs are derived from the relative path on demand and
//! never persisted.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use thiserror::Error;
use tokio::fs;

/// Default upload size cap: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// MIME types accepted for upload: PDF, legacy/modern Word and Excel,
/// JPEG and PNG. `image/jpg` is nonstandard but some browsers send it.
const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "image/jpeg",
    "image/png",
    "image/jpg",
];

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("file of {size} bytes exceeds the {max}-byte limit")]
    FileTooLarge { size: u64, max: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Storage engine configuration, built once at startup and injected.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory of the upload tree.
    pub root: PathBuf,
    /// Maximum accepted file size in bytes.
    pub max_file_size: u64,
    /// Base URL the public site is served from (no trailing slash).
    pub public_base_url: String,
}

/// An upload staged to a temporary file, awaiting validation and save.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as submitted by the client (display only, never a path).
    pub original_name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Staged temporary file; `save` consumes and removes it.
    pub temp_path: PathBuf,
}

/// File storage engine. Cheap to clone; shared via the app state.
#[derive(Debug, Clone)]
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Whether the declared MIME type is on the upload allow-list.
    pub fn is_allowed_type(&self, mime_type: &str) -> bool {
        ALLOWED_MIME_TYPES.contains(&mime_type)
    }

    /// Whether the byte size is within the configured maximum.
    pub fn is_allowed_size(&self, size: u64) -> bool {
        size <= self.config.max_file_size
    }

    /// Run both upload checks, reporting the first failure.
    pub fn validate(&self, mime_type: &str, size: u64) -> Result<(), StorageError> {
        if !self.is_allowed_type(mime_type) {
            return Err(StorageError::UnsupportedType(mime_type.to_string()));
        }
        if !self.is_allowed_size(size) {
            return Err(StorageError::FileTooLarge {
                size,
                max: self.config.max_file_size,
            });
        }
        Ok(())
    }

    /// Write incoming bytes to a uniquely named file under `{root}/temp`,
    /// returning its path for a later `save`.
    pub async fn stage(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let temp_dir = self.config.root.join("temp");
        fs::create_dir_all(&temp_dir).await?;
        let ext = Path::new(original_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let temp_path = temp_dir.join(format!("{}{ext}", unique_millis()));
        fs::write(&temp_path, bytes).await?;
        Ok(temp_path)
    }

    /// Validate and persist a staged upload.
    ///
    /// Fails before touching the destination tree if the type or size
    /// check fails. On success the temp source is removed and the
    /// root-relative path is returned, always with `/` separators.
    pub async fn save(&self, upload: &UploadedFile) -> Result<String, StorageError> {
        self.validate(&upload.mime_type, upload.size)?;

        let now = Utc::now();
        let year = now.format("%Y").to_string();
        let month = now.format("%m").to_string();
        let dir = self.config.root.join(&year).join(&month);
        fs::create_dir_all(&dir).await?;

        let file_name = format!(
            "{}-{}",
            unique_millis(),
            sanitize_file_name(&upload.original_name)
        );
        fs::copy(&upload.temp_path, dir.join(&file_name)).await?;
        fs::remove_file(&upload.temp_path).await?;

        Ok(format!("{year}/{month}/{file_name}"))
    }

    /// Remove a stored file. A file that is already absent is fine;
    /// any other I/O failure is returned so the caller can decide how
    /// loudly to complain.
    pub async fn delete(&self, relative_path: &str) -> Result<(), StorageError> {
        if relative_path.is_empty() {
            return Ok(());
        }
        match fs::remove_file(self.config.root.join(relative_path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Read a stored file's bytes.
    pub async fn read(&self, relative_path: &str) -> Result<Vec<u8>, StorageError> {
        Ok(fs::read(self.config.root.join(relative_path)).await?)
    }

    /// Public download URL for a stored file. Pure function of the
    /// relative path and the configured base URL.
    pub fn public_url(&self, relative_path: &str) -> String {
        format!(
            "{}/uploads/{}",
            self.config.public_base_url.trim_end_matches('/'),
            relative_path.replace('\\', "/")
        )
    }

    /// Root directory of the upload tree (for static serving).
    pub fn root(&self) -> &Path {
        &self.config.root
    }
}

/// Strictly monotonic millisecond timestamps. Two saves landing on the
/// same clock millisecond still get distinct filename prefixes.
fn unique_millis() -> i64 {
    static LAST: AtomicI64 = AtomicI64::new(0);
    let now = Utc::now().timestamp_millis();
    let mut prev = LAST.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => prev = observed,
        }
    }
}

/// Make a client-supplied filename safe for the storage tree: ASCII-fold
/// accented Latin characters, lowercase, and replace anything outside
/// `[a-z0-9.-_]` with `_`.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Fold the Latin-1 accent range to plain ASCII. Input is already
/// lowercased.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage(root: &Path, max_file_size: u64) -> Storage {
        Storage::new(StorageConfig {
            root: root.to_path_buf(),
            max_file_size,
            public_base_url: "http://localhost:3001".into(),
        })
    }

    #[test]
    fn sanitize_folds_accents_and_replaces_specials() {
        assert_eq!(
            sanitize_file_name("Relatório Anual (2).PDF"),
            "relatorio_anual__2_.pdf"
        );
        assert_eq!(sanitize_file_name("prestação-contas_06.xlsx"), "prestacao-contas_06.xlsx");
        assert_eq!(sanitize_file_name("foto.jpeg"), "foto.jpeg");
    }

    #[test]
    fn unique_millis_never_repeats() {
        let mut last = 0;
        for _ in 0..1000 {
            let next = unique_millis();
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn size_limit_is_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let storage = test_storage(dir.path(), DEFAULT_MAX_FILE_SIZE);
        assert!(storage.is_allowed_size(10_485_760));
        assert!(!storage.is_allowed_size(10_485_761));
    }

    #[tokio::test]
    async fn save_partitions_by_date_and_cleans_temp() {
        let dir = tempfile::tempdir().unwrap();
        let storage = test_storage(dir.path(), DEFAULT_MAX_FILE_SIZE);

        let temp = storage.stage("Relatório.pdf", b"%PDF-1.7").await.unwrap();
        assert!(temp.exists());

        let upload = UploadedFile {
            original_name: "Relatório.pdf".into(),
            mime_type: "application/pdf".into(),
            size: 8,
            temp_path: temp.clone(),
        };
        let rel = storage.save(&upload).await.unwrap();

        let parts: Vec<&str> = rel.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], Utc::now().format("%Y").to_string());
        assert_eq!(parts[1], Utc::now().format("%m").to_string());
        let (prefix, name) = parts[2].split_once('-').unwrap();
        assert!(prefix.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(name, "relatorio.pdf");

        assert!(dir.path().join(&rel).exists());
        assert!(!temp.exists(), "temp source should be removed after save");
    }

    #[tokio::test]
    async fn save_rejects_disallowed_type_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = test_storage(dir.path(), DEFAULT_MAX_FILE_SIZE);

        let temp = storage.stage("run.exe", b"MZ").await.unwrap();
        let upload = UploadedFile {
            original_name: "run.exe".into(),
            mime_type: "application/octet-stream".into(),
            size: 2,
            temp_path: temp,
        };
        let err = storage.save(&upload).await.unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedType(_)));

        let year_dir = dir.path().join(Utc::now().format("%Y").to_string());
        assert!(!year_dir.exists(), "no destination should be created");
    }

    #[tokio::test]
    async fn save_rejects_oversize() {
        let dir = tempfile::tempdir().unwrap();
        let storage = test_storage(dir.path(), 16);

        let temp = storage.stage("big.pdf", &[0u8; 17]).await.unwrap();
        let upload = UploadedFile {
            original_name: "big.pdf".into(),
            mime_type: "application/pdf".into(),
            size: 17,
            temp_path: temp,
        };
        let err = storage.save(&upload).await.unwrap_err();
        assert!(matches!(err, StorageError::FileTooLarge { size: 17, max: 16 }));
    }

    #[tokio::test]
    async fn delete_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = test_storage(dir.path(), DEFAULT_MAX_FILE_SIZE);
        storage.delete("2026/02/123-gone.pdf").await.unwrap();
        storage.delete("").await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_saved_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = test_storage(dir.path(), DEFAULT_MAX_FILE_SIZE);

        let temp = storage.stage("nota.png", b"\x89PNG").await.unwrap();
        let upload = UploadedFile {
            original_name: "nota.png".into(),
            mime_type: "image/png".into(),
            size: 4,
            temp_path: temp,
        };
        let rel = storage.save(&upload).await.unwrap();
        assert!(dir.path().join(&rel).exists());

        storage.delete(&rel).await.unwrap();
        assert!(!dir.path().join(&rel).exists());
    }

    #[test]
    fn public_url_is_base_plus_uploads_plus_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = test_storage(dir.path(), DEFAULT_MAX_FILE_SIZE);
        assert_eq!(
            storage.public_url("2026/02/1700000000000-relatorio.pdf"),
            "http://localhost:3001/uploads/2026/02/1700000000000-relatorio.pdf"
        );
        assert_eq!(
            storage.public_url("2026\\02\\x.pdf"),
            "http://localhost:3001/uploads/2026/02/x.pdf"
        );
    }
}
