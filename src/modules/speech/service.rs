use axum::http::StatusCode;
use serde_json::Value;
use tracing::info;

use super::dto::GenerateAudioRequest;
use crate::common::response::ApiError;
use crate::infrastructure::speech::replicate::{is_prediction_id, SpeechError};
use crate::state::AppState;

pub struct SpeechService;

impl SpeechService {
    pub async fn generate_audio(state: &AppState, req: &GenerateAudioRequest) -> Result<String, ApiError> {
        let voice = req
            .voice
            .as_deref()
            .unwrap_or(&state.config.speech.default_voice_url);
        info!("🗣️ Synthesizing {} characters with voice {}", req.text.chars().count(), voice);

        let output = Self::bounded(state, state.speech.synthesize(&req.text, voice)).await?;
        Ok(audio_url_from_output(&output))
    }

    pub async fn prediction_status(state: &AppState, id: &str) -> Result<Value, ApiError> {
        if !is_prediction_id(id) {
            return Err(ApiError(SpeechError::InvalidPredictionId.to_string(), StatusCode::BAD_REQUEST));
        }
        Self::bounded(state, state.speech.prediction(id)).await
    }

    async fn bounded<F>(state: &AppState, call: F) -> Result<Value, ApiError>
    where
        F: std::future::Future<Output = Result<Value, SpeechError>>,
    {
        let limit = state.config.timeouts.speech;
        let token = state.shutdown.child_token();

        tokio::select! {
            biased;
            _ = token.cancelled() => Err(ApiError("Speech request cancelled".to_string(), StatusCode::SERVICE_UNAVAILABLE)),
            outcome = tokio::time::timeout(limit, call) => match outcome {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(ApiError(e.to_string(), status_for(&e))),
                Err(_) => Err(ApiError(
                    format!("speech synthesis timed out after {}s", limit.as_secs()),
                    StatusCode::GATEWAY_TIMEOUT,
                )),
            },
        }
    }
}

fn status_for(error: &SpeechError) -> StatusCode {
    match error {
        SpeechError::MissingToken | SpeechError::BaseUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SpeechError::InvalidPredictionId => StatusCode::BAD_REQUEST,
        SpeechError::Http(_) | SpeechError::Api { .. } | SpeechError::PredictionFailed { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

/// Reduces whatever the model produced to a single URL string.
///
/// File outputs may come back as `{"path": ...}`; anything else is used whole.
pub fn audio_url_from_output(output: &Value) -> String {
    match output {
        Value::Object(map) if map.contains_key("path") => stringify(&map["path"]),
        other => stringify(other),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
