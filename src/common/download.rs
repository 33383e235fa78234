use crate::common::workspace::JobId;
use futures_util::StreamExt;
use reqwest::StatusCode;
use std::io;
use std::path::Path;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Video,
    Audio,
    Image,
}

impl AssetKind {
    /// Word used in "Failed to download <label>" messages.
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Video => "video",
            AssetKind::Audio => "audio",
            AssetKind::Image => "image",
        }
    }

    fn default_extension(&self) -> &'static str {
        match self {
            AssetKind::Video => ".mp4",
            AssetKind::Audio => ".wav",
            AssetKind::Image => ".png",
        }
    }
}

/// Local file name for an asset fetched from `url`, e.g. `audio_<id>.mp3`.
///
/// Videos are always stored as `.mp4`. Other assets keep the extension of the
/// URL path so the tool can sniff the format from it.
pub fn asset_file_name(prefix: &str, kind: AssetKind, id: &JobId, url: &str) -> String {
    let extension = match kind {
        AssetKind::Video => kind.default_extension().to_string(),
        _ => url_extension(url).unwrap_or_else(|| kind.default_extension().to_string()),
    };

    format!("{}_{}{}", prefix, id, extension)
}

fn url_extension(raw: &str) -> Option<String> {
    let path = match url::Url::parse(raw) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => raw.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let file_name = path.rsplit('/').next()?;
    let extension = Path::new(file_name).extension()?.to_str()?;
    if extension.is_empty() {
        return None;
    }

    Some(format!(".{}", extension.to_ascii_lowercase()))
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{}", .0.as_u16())]
    Status(StatusCode),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not write file: {0}")]
    Io(#[from] io::Error),
}

#[derive(Clone)]
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Streams `url` into `dest`, returning the number of bytes written.
    ///
    /// Only `200 OK` counts as success. On any other status nothing is written
    /// to disk.
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::Status(status));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        info!("⬇️ Downloaded {} bytes to {}", written, dest.display());
        Ok(written)
    }
}
