use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::dto::{FaceSwapRequest, GenerateVideoRequest};
use super::error::{JobError, JobStage};
use crate::common::download::{asset_file_name, AssetKind};
use crate::common::workspace::{JobId, JobWorkspace};
use crate::infrastructure::processor::facefusion::{FrameProcessorKind, ProcessRequest};
use crate::infrastructure::storage::s3::ResourceKind;
use crate::state::AppState;

struct Input<'a> {
    name: &'static str,
    url: &'a str,
    kind: AssetKind,
}

struct JobPlan<'a> {
    target: Input<'a>,
    source: Input<'a>,
    processor: FrameProcessorKind,
    output: ResourceKind,
}

pub struct GenerationService;

impl GenerationService {
    /// Lip-syncs `video` to `audio` and returns the public URL of the result.
    pub async fn generate_video(state: &AppState, req: &GenerateVideoRequest) -> Result<String, JobError> {
        Self::run(
            state,
            JobPlan {
                target: Input {
                    name: "video",
                    url: &req.video,
                    kind: AssetKind::Video,
                },
                source: Input {
                    name: "audio",
                    url: &req.audio,
                    kind: AssetKind::Audio,
                },
                processor: FrameProcessorKind::LipSyncer,
                output: ResourceKind::Video,
            },
        )
        .await
    }

    /// Puts the face from `source_image` onto `target_image`.
    pub async fn face_swap(state: &AppState, req: &FaceSwapRequest) -> Result<String, JobError> {
        Self::run(
            state,
            JobPlan {
                target: Input {
                    name: "target",
                    url: &req.target_image,
                    kind: AssetKind::Image,
                },
                source: Input {
                    name: "source",
                    url: &req.source_image,
                    kind: AssetKind::Image,
                },
                processor: FrameProcessorKind::FaceSwapper,
                output: ResourceKind::Image,
            },
        )
        .await
    }

    async fn run(state: &AppState, plan: JobPlan<'_>) -> Result<String, JobError> {
        let token = state.shutdown.child_token();
        let timeouts = state.config.timeouts;

        // Dropping the workspace removes every file below, whatever happens next.
        let workspace = JobWorkspace::create(&state.config.download_dir).await?;
        let id = workspace.id().clone();
        info!(job = %id, processor = plan.processor.as_arg(), dir = %workspace.dir().display(), "📦 Received job");

        let target = Self::download(state, &workspace, &plan.target, &token).await?;
        let source = Self::download(state, &workspace, &plan.source, &token).await?;

        let output = workspace.file(&output_file_name(plan.output, &id, &target));
        let request = ProcessRequest {
            target,
            source,
            output: output.clone(),
            processor: plan.processor,
        };

        info!(job = %id, "Invoking frame processor");
        let outcome = guard(JobStage::InvokingTool, timeouts.process, &token, async {
            state.processor.run(&request).await.map_err(JobError::from)
        })
        .await?;

        if !outcome.success() {
            warn!(job = %id, exit_code = ?outcome.exit_code, "Frame processor failed");
            return Err(JobError::ToolFailed {
                exit_code: outcome.exit_code,
                stderr: outcome.stderr,
            });
        }

        let public_id = format!("{}_{}", plan.output.label(), id);
        info!(job = %id, "⬆️ Uploading {}", public_id);
        let artifact = guard(JobStage::Uploading, timeouts.upload, &token, async {
            state
                .storage
                .upload(&output, plan.output, &public_id)
                .await
                .map_err(JobError::from)
        })
        .await?;

        info!(job = %id, key = %artifact.key, "✅ Job completed: {}", artifact.secure_url);
        Ok(artifact.secure_url)
    }

    async fn download(
        state: &AppState,
        workspace: &JobWorkspace,
        input: &Input<'_>,
        token: &CancellationToken,
    ) -> Result<PathBuf, JobError> {
        let dest = workspace.file(&asset_file_name(input.name, input.kind, workspace.id(), input.url));

        guard(JobStage::Downloading, state.config.timeouts.download, token, async {
            state
                .downloader
                .fetch(input.url, &dest)
                .await
                .map_err(|source| JobError::Download {
                    asset: input.kind,
                    source,
                })
        })
        .await?;

        Ok(dest)
    }
}

/// Videos come out as mp4; images keep the target's format.
fn output_file_name(kind: ResourceKind, id: &JobId, target: &Path) -> String {
    let extension = match kind {
        ResourceKind::Video => "mp4",
        ResourceKind::Image => target
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png"),
    };

    format!("output_{}.{}", id, extension)
}

/// Runs one pipeline stage under its deadline, giving up early on shutdown.
async fn guard<T, F>(
    stage: JobStage,
    limit: Duration,
    token: &CancellationToken,
    work: F,
) -> Result<T, JobError>
where
    F: Future<Output = Result<T, JobError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(JobError::Cancelled(stage)),
        outcome = tokio::time::timeout(limit, work) => match outcome {
            Ok(result) => result,
            Err(_) => Err(JobError::Timeout { stage, limit }),
        },
    }
}
