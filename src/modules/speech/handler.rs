use crate::common::extract::ApiJson;
use crate::common::response::{ApiError, ApiSuccess, MessageResponse};
use crate::modules::speech::dto::*;
use crate::modules::speech::service::SpeechService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

/// Synthesize speech in the voice of a sample clip
#[utoipa::path(
    post,
    path = "/generate-audio",
    request_body = GenerateAudioRequest,
    responses(
        (status = 200, description = "Audio generated", body = GenerateAudioResponse),
        (status = 422, description = "Invalid request", body = MessageResponse),
        (status = 500, description = "Speech service not configured", body = MessageResponse),
        (status = 502, description = "Speech service failed", body = MessageResponse),
        (status = 504, description = "Speech service timed out", body = MessageResponse)
    ),
    tag = "Speech"
)]
pub async fn generate_audio(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateAudioRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return ApiError(e.to_string(), StatusCode::UNPROCESSABLE_ENTITY).into_response();
    }

    match SpeechService::generate_audio(&state, &req).await {
        Ok(audio_url) => ApiSuccess(GenerateAudioResponse { audio_url }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Current state of a speech prediction
#[utoipa::path(
    get,
    path = "/prediction-status",
    params(PredictionStatusQuery),
    responses(
        (status = 200, description = "Prediction as reported by the speech service"),
        (status = 400, description = "Missing or invalid prediction ID", body = MessageResponse),
        (status = 502, description = "Speech service failed", body = MessageResponse)
    ),
    tag = "Speech"
)]
pub async fn prediction_status(
    State(state): State<AppState>,
    Query(query): Query<PredictionStatusQuery>,
) -> impl IntoResponse {
    let Some(id) = query.id.filter(|id| !id.trim().is_empty()) else {
        return ApiError("Missing prediction ID".to_string(), StatusCode::BAD_REQUEST).into_response();
    };

    match SpeechService::prediction_status(&state, &id).await {
        Ok(prediction) => ApiSuccess(prediction, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}
