use crate::common::extract::ApiJson;
use crate::common::response::{ApiError, ApiSuccess, MessageResponse};
use crate::modules::generation::dto::*;
use crate::modules::generation::service::GenerationService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

/// Lip-sync a video to an audio track
#[utoipa::path(
    post,
    path = "/generate-video",
    request_body = GenerateVideoRequest,
    responses(
        (status = 200, description = "Video generated, or a download/processing failure message", body = GenerateVideoResponse),
        (status = 422, description = "Invalid request", body = MessageResponse),
        (status = 500, description = "Frame processor could not be started", body = MessageResponse),
        (status = 502, description = "Upstream download or upload failed", body = MessageResponse),
        (status = 504, description = "A stage timed out", body = MessageResponse)
    ),
    tag = "Generation"
)]
pub async fn generate_video(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateVideoRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return ApiError(e.to_string(), StatusCode::UNPROCESSABLE_ENTITY).into_response();
    }

    match GenerationService::generate_video(&state, &req).await {
        Ok(url) => ApiSuccess(
            GenerateVideoResponse {
                message: "Video generated successfully".to_string(),
                video_path: url,
            },
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Swap the face of one image onto another
#[utoipa::path(
    post,
    path = "/faceswap",
    request_body = FaceSwapRequest,
    responses(
        (status = 200, description = "Image generated, or a download/processing failure message", body = FaceSwapResponse),
        (status = 422, description = "Invalid request", body = MessageResponse),
        (status = 500, description = "Frame processor could not be started", body = MessageResponse),
        (status = 502, description = "Upstream download or upload failed", body = MessageResponse),
        (status = 504, description = "A stage timed out", body = MessageResponse)
    ),
    tag = "Generation"
)]
pub async fn face_swap(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FaceSwapRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return ApiError(e.to_string(), StatusCode::UNPROCESSABLE_ENTITY).into_response();
    }

    match GenerationService::face_swap(&state, &req).await {
        Ok(url) => ApiSuccess(
            FaceSwapResponse {
                message: "Image generated successfully".to_string(),
                image_path: url,
            },
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}
