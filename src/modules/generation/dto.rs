use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// --- LIP SYNC ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateVideoRequest {
    /// Video whose lips are re-synchronised.
    #[validate(url)]
    pub video: String,
    /// Audio track driving the lip movement.
    #[validate(url)]
    pub audio: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateVideoResponse {
    pub message: String,
    pub video_path: String,
}

// --- FACE SWAP ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FaceSwapRequest {
    /// Image providing the face.
    #[validate(url)]
    pub source_image: String,
    /// Image the face is placed onto.
    #[validate(url)]
    pub target_image: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FaceSwapResponse {
    pub message: String,
    pub image_path: String,
}
