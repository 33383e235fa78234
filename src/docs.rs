use utoipa::OpenApi;
use crate::common::response::MessageResponse;
use crate::modules::generation::dto::*;
use crate::modules::speech::dto::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::system::handler::hello,
        crate::modules::generation::handler::generate_video,
        crate::modules::generation::handler::face_swap,
        crate::modules::speech::handler::generate_audio,
        crate::modules::speech::handler::prediction_status,
    ),
    components(
        schemas(
            MessageResponse,
            GenerateVideoRequest, GenerateVideoResponse,
            FaceSwapRequest, FaceSwapResponse,
            GenerateAudioRequest, GenerateAudioResponse,
        )
    ),
    tags(
        (name = "System", description = "Service status"),
        (name = "Generation", description = "Lip sync and face swap jobs"),
        (name = "Speech", description = "Voice-cloned speech synthesis")
    )
)]
pub struct ApiDoc;
