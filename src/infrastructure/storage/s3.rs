use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{config::BehaviorVersion, config::Credentials, config::Region, Client};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::config::settings::StorageConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Video,
    Image,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Video => "video",
            ResourceKind::Image => "image",
        }
    }

    fn fallback_content_type(&self) -> &'static str {
        match self {
            ResourceKind::Video => "video/mp4",
            ResourceKind::Image => "image/png",
        }
    }

    fn fallback_extension(&self) -> &'static str {
        match self {
            ResourceKind::Video => "mp4",
            ResourceKind::Image => "png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub key: String,
    pub secure_url: String,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not read {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("upload of {key} failed: {reason}")]
    Upload { key: String, reason: String },
}

/// Durable home for generated media.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(
        &self,
        path: &Path,
        kind: ResourceKind,
        public_id: &str,
    ) -> Result<StoredArtifact, StorageError>;
}

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
    pub bucket: String,
    folder: String,
    public_url: String,
}

impl StorageService {
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.as_str(),
            config.secret_key.as_str(),
            None,
            None,
            "static",
        );

        let s3_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint.as_str())
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(s3_config);

        let public_url = config
            .public_url
            .clone()
            .unwrap_or_else(|| format!("{}/{}", config.endpoint.trim_end_matches('/'), config.bucket));

        info!("✅ Storage client ready for bucket '{}'", config.bucket);

        Self {
            client,
            bucket: config.bucket.clone(),
            folder: config.folder.clone(),
            public_url,
        }
    }

    pub fn object_key(&self, path: &Path, kind: ResourceKind, public_id: &str) -> String {
        object_key(&self.folder, path, kind, public_id)
    }

    pub fn secure_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url.trim_end_matches('/'), key)
    }
}

fn object_key(folder: &str, path: &Path, kind: ResourceKind, public_id: &str) -> String {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .unwrap_or(kind.fallback_extension());

    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        format!("{}.{}", public_id, extension)
    } else {
        format!("{}/{}.{}", folder, public_id, extension)
    }
}

fn content_type(path: &Path, kind: ResourceKind) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| kind.fallback_content_type().to_string())
}

#[async_trait]
impl MediaStore for StorageService {
    async fn upload(
        &self,
        path: &Path,
        kind: ResourceKind,
        public_id: &str,
    ) -> Result<StoredArtifact, StorageError> {
        let key = self.object_key(path, kind, public_id);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body)
            .content_type(content_type(path, kind))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.clone(),
                reason: DisplayErrorContext(e).to_string(),
            })?;

        let secure_url = self.secure_url(&key);
        info!("⬆️ Uploaded {} to {}", path.display(), secure_url);

        Ok(StoredArtifact { key, secure_url })
    }
}
