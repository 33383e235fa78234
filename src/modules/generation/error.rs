use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::common::download::{AssetKind, DownloadError};
use crate::common::response::ApiError;
use crate::infrastructure::processor::facefusion::ProcessError;
use crate::infrastructure::storage::s3::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Downloading,
    InvokingTool,
    Uploading,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStage::Downloading => write!(f, "download"),
            JobStage::InvokingTool => write!(f, "frame processing"),
            JobStage::Uploading => write!(f, "upload"),
        }
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Failed to download {}: {}", .asset.label(), .source)]
    Download {
        asset: AssetKind,
        #[source]
        source: DownloadError,
    },
    #[error("Command failed with error: {stderr}")]
    ToolFailed { exit_code: Option<i32>, stderr: String },
    #[error("Frame processor unavailable: {0}")]
    ToolLaunch(#[from] ProcessError),
    #[error("Failed to upload result: {0}")]
    Upload(#[from] StorageError),
    #[error("Could not prepare job workspace: {0}")]
    Workspace(#[from] io::Error),
    #[error("{stage} timed out after {}s", .limit.as_secs())]
    Timeout { stage: JobStage, limit: Duration },
    #[error("Job cancelled during {0}")]
    Cancelled(JobStage),
}

impl JobError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Upstream 4xx/5xx on a download and a failing tool are answered
            // with 200 and a message, as the existing clients expect.
            JobError::Download {
                source: DownloadError::Status(_),
                ..
            } => StatusCode::OK,
            JobError::ToolFailed { .. } => StatusCode::OK,
            JobError::Download { .. } => StatusCode::BAD_GATEWAY,
            JobError::ToolLaunch(_) | JobError::Workspace(_) => StatusCode::INTERNAL_SERVER_ERROR,
            JobError::Upload(_) => StatusCode::BAD_GATEWAY,
            JobError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            JobError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for JobError {
    fn into_response(self) -> Response {
        if let JobError::ToolFailed { exit_code, .. } = &self {
            tracing::debug!("Frame processor exit code {:?}", exit_code);
        }
        ApiError(self.to_string(), self.status_code()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode as UpstreamStatus;

    #[test]
    fn download_status_message_names_the_code() {
        let err = JobError::Download {
            asset: AssetKind::Image,
            source: DownloadError::Status(UpstreamStatus::NOT_FOUND),
        };
        assert_eq!(err.to_string(), "Failed to download image: 404");
        assert_eq!(err.status_code(), StatusCode::OK);
    }

    #[test]
    fn tool_failure_embeds_stderr() {
        let err = JobError::ToolFailed {
            exit_code: Some(1),
            stderr: "no source face".to_string(),
        };
        assert_eq!(err.to_string(), "Command failed with error: no source face");
    }

    #[test]
    fn timeouts_name_the_stage() {
        let err = JobError::Timeout {
            stage: JobStage::InvokingTool,
            limit: Duration::from_secs(90),
        };
        assert_eq!(err.to_string(), "frame processing timed out after 90s");
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }
}
