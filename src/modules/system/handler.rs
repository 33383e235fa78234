use crate::common::response::{ApiSuccess, MessageResponse};
use axum::{http::StatusCode, response::IntoResponse};

/// Liveness greeting
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = MessageResponse)
    ),
    tag = "System"
)]
pub async fn hello() -> impl IntoResponse {
    ApiSuccess(MessageResponse::new("Hello, World!"), StatusCode::OK)
}
