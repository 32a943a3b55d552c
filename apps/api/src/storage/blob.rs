//! Object-store upload of candidate records (S3 API; MinIO locally).

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use super::StorageError;

const DEFAULT_REGION: &str = "us-east-1";

/// Destination for uploaded records. Implemented by `S3Uploader`; tests swap in memory.
#[async_trait]
pub trait BlobUploader: Send + Sync {
    async fn upload(&self, key: &str, body: Vec<u8>) -> Result<(), StorageError>;
}

/// Parsed `Key=Value;Key=Value` connection string.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobConnection {
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl BlobConnection {
    pub fn parse(conn_str: &str) -> Result<Self, StorageError> {
        let mut endpoint = None;
        let mut access_key_id = None;
        let mut secret_access_key = None;
        let mut region = None;

        for part in conn_str.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                StorageError::InvalidConnection(format!("segment without '=': {part}"))
            })?;
            let value = value.trim().to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(value),
                "accesskeyid" => access_key_id = Some(value),
                "secretaccesskey" => secret_access_key = Some(value),
                "region" => region = Some(value),
                other => {
                    return Err(StorageError::InvalidConnection(format!(
                        "unknown key '{other}'"
                    )))
                }
            }
        }

        Ok(Self {
            endpoint: endpoint.filter(|e| !e.is_empty()),
            access_key_id: access_key_id
                .ok_or_else(|| StorageError::InvalidConnection("missing AccessKeyId".into()))?,
            secret_access_key: secret_access_key.ok_or_else(|| {
                StorageError::InvalidConnection("missing SecretAccessKey".into())
            })?,
            region: region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }
}

pub struct S3Uploader {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Uploader {
    /// Builds a client for MinIO (custom endpoint) or AWS (no endpoint).
    pub async fn from_connection_string(
        conn_str: &str,
        container: &str,
    ) -> Result<Self, StorageError> {
        let conn = BlobConnection::parse(conn_str)?;

        let credentials = Credentials::new(
            &conn.access_key_id,
            &conn.secret_access_key,
            None,
            None,
            "talentscout-static",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(conn.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &conn.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: container.to_string(),
        })
    }
}

#[async_trait]
impl BlobUploader for S3Uploader {
    async fn upload(&self, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::Upload(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
