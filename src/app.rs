use axum::Router;
use axum::extract::DefaultBodyLimit;
use crate::common::upload::MAX_IMAGE_BYTES;
use crate::state::AppState;
use tower_cookies::CookieManagerLayer;
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

// Room for the multipart envelope around the largest accepted image.
const MAX_BODY_BYTES: usize = MAX_IMAGE_BYTES + 1024 * 1024;

pub async fn create_app(state: AppState) -> Router {
    crate::routes::configure_routes()
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
