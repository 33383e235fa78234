use axum::routing::{get, post};
use axum::Router;
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-audio", post(handler::generate_audio))
        .route("/prediction-status", get(handler::prediction_status))
}
