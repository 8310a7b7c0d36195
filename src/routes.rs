use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::docs::ApiDoc;
use crate::modules::{content, hero, media, popularity, recommendation};
use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use crate::state::AppState;

use tower_http::cors::{Any, CorsLayer};

pub fn configure_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1", api_routes())
        .nest("/api/v1/admin", admin_routes())
        .layer(cors)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(content::router())
        .merge(recommendation::router())
}

fn admin_routes() -> Router<AppState> {
    content::admin_router()
        .merge(popularity::admin_router())
        .merge(hero::admin_router())
        .merge(media::admin_router())
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Service is up", body = ApiResponse<String>)),
    tag = "Health"
)]
pub async fn health() -> impl IntoResponse {
    ApiSuccess(ApiResponse::success("ok", "Service is healthy"), StatusCode::OK)
}
