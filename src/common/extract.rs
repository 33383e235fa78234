use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::common::response::ApiError;

/// `Json` whose rejections (bad syntax, missing fields, wrong content type,
/// oversized body) answer with the usual `{"message"}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(rejection.body_text(), rejection.status())
    }
}
