use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use crate::docs::ApiDoc;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::Router;
use crate::state::AppState;

use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Request bodies are small JSON documents holding URLs and text.
const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn configure_routes() -> Router<AppState> {
    // Credentials cannot be combined with a literal `*`, so origins and
    // headers are echoed back instead.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(crate::modules::system::router())
        .merge(crate::modules::generation::router())
        .merge(crate::modules::speech::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
}
