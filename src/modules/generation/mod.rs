use axum::routing::post;
use axum::Router;
use crate::state::AppState;

pub mod dto;
pub mod error;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-video", post(handler::generate_video))
        .route("/faceswap", post(handler::face_swap))
}
