use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateAudioRequest {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
    /// Sample clip of the voice to imitate. Falls back to the configured default voice.
    #[validate(url)]
    pub voice: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateAudioResponse {
    pub audio_url: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PredictionStatusQuery {
    /// Prediction id returned by the speech service.
    pub id: Option<String>,
}
