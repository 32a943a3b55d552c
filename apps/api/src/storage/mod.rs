//! Persistence for finished screening records.
//!
//! Every save writes one new JSON file under the data directory; files are never
//! updated or removed. An object-store upload can be layered on top and is strictly
//! best-effort.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::candidate::AnonymizedRecord;

pub mod blob;

pub use blob::BlobUploader;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid blob connection string: {0}")]
    InvalidConnection(String),

    #[error("Upload failed: {0}")]
    Upload(String),
}

#[derive(Clone)]
pub struct CandidateStore {
    data_dir: PathBuf,
    uploader: Option<Arc<dyn BlobUploader>>,
}

impl CandidateStore {
    pub fn new(data_dir: impl Into<PathBuf>, uploader: Option<Arc<dyn BlobUploader>>) -> Self {
        Self {
            data_dir: data_dir.into(),
            uploader,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn upload_enabled(&self) -> bool {
        self.uploader.is_some()
    }

    /// Writes the record to `<data_dir>/candidate_<timestamp>.json` and returns the path.
    /// Fails rather than overwrite an existing file.
    pub async fn save_local(&self, record: &AnonymizedRecord) -> Result<PathBuf, StorageError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let ts = Utc::now().format("%Y%m%dT%H%M%S%.6fZ");
        let path = self.data_dir.join(format!("candidate_{ts}.json"));
        let body = serde_json::to_vec_pretty(record)?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(&body).await?;
        file.flush().await?;

        info!("Saved candidate locally: {}", path.display());
        Ok(path)
    }

    /// Uploads the record when an uploader is configured. Never fails; reports success.
    pub async fn try_upload(&self, record: &AnonymizedRecord) -> bool {
        let Some(uploader) = &self.uploader else {
            info!("Blob storage not configured (BLOB_CONN_STR or BLOB_CONTAINER missing). Skipping upload.");
            return false;
        };

        let body = match serde_json::to_vec(record) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to serialize candidate for upload: {e}");
                return false;
            }
        };
        let key = format!("candidate_{}.json", Utc::now().to_rfc3339());

        match uploader.upload(&key, body).await {
            Ok(()) => {
                info!("Uploaded candidate to blob storage as {key}");
                true
            }
            Err(e) => {
                error!("Failed to upload to blob storage: {e}");
                false
            }
        }
    }
}

/// Builds the optional uploader from configuration. A bad connection string
/// disables uploads instead of failing startup.
pub async fn build_uploader(config: &Config) -> Option<Arc<dyn BlobUploader>> {
    let (Some(conn_str), Some(container)) = (&config.blob_conn_str, &config.blob_container) else {
        return None;
    };

    match blob::S3Uploader::from_connection_string(conn_str, container).await {
        Ok(uploader) => Some(Arc::new(uploader) as Arc<dyn BlobUploader>),
        Err(e) => {
            warn!("Blob upload disabled: {e}");
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::MemoryUploader;
    use super::*;
    use crate::models::candidate::{CandidateProfile, REDACTED_EMAIL, REDACTED_PHONE};

    fn record() -> AnonymizedRecord {
        let mut profile = CandidateProfile::blank(Utc::now());
        profile.full_name = "Grace Hopper".to_string();
        profile.email = "a@b.com".to_string();
        profile.phone = "555-1234".to_string();
        AnonymizedRecord::new(&profile, &["Explain the difference between X and Y".to_string()])
    }

    #[tokio::test]
    async fn test_save_local_writes_redacted_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandidateStore::new(dir.path().join("candidates"), None);
        let record = record();

        let path = store.save_local(&record).await.unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("candidate_") && name.ends_with("Z.json"), "{name}");

        let saved: AnonymizedRecord =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(saved.candidate.email, REDACTED_EMAIL);
        assert_eq!(saved.candidate.phone, REDACTED_PHONE);
        assert_eq!(saved, record);
    }

    #[tokio::test]
    async fn test_each_save_creates_a_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandidateStore::new(dir.path(), None);

        let first = store.save_local(&record()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = store.save_local(&record()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_save_local_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"occupied").unwrap();

        let store = CandidateStore::new(&blocker, None);
        assert!(matches!(
            store.save_local(&record()).await,
            Err(StorageError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_skipped_when_not_configured() {
        let store = CandidateStore::new("unused", None);
        assert!(!store.upload_enabled());
        assert!(!store.try_upload(&record()).await);
    }

    #[tokio::test]
    async fn test_upload_success_reports_true() {
        let uploader = Arc::new(MemoryUploader::default());
        let store = CandidateStore::new("unused", Some(uploader.clone() as Arc<dyn BlobUploader>));

        assert!(store.try_upload(&record()).await);

        let objects = uploader.objects.lock().await;
        assert_eq!(objects.len(), 1);
        assert!(objects[0].0.starts_with("candidate_"));
        let uploaded: AnonymizedRecord = serde_json::from_slice(&objects[0].1).unwrap();
        assert_eq!(uploaded.candidate.phone, REDACTED_PHONE);
    }

    #[tokio::test]
    async fn test_upload_failure_reports_false() {
        let uploader = Arc::new(MemoryUploader {
            fail: true,
            ..MemoryUploader::default()
        });
        let store = CandidateStore::new("unused", Some(uploader));
        assert!(!store.try_upload(&record()).await);
    }

    #[tokio::test]
    async fn test_build_uploader_needs_both_settings() {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.blob_conn_str = Some("Endpoint=http://127.0.0.1:9000".to_string());
        assert!(build_uploader(&config).await.is_none());
    }

    #[tokio::test]
    async fn test_build_uploader_rejects_bad_connection_string() {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.blob_conn_str = Some("garbage".to_string());
        config.blob_container = Some("candidates".to_string());
        assert!(build_uploader(&config).await.is_none());
    }
}
