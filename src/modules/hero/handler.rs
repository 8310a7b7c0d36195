use super::dto::HeroArtRequest;
use super::service::HeroService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::modules::content::model::Content;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// Save the hero banner layers of a title
#[utoipa::path(
    patch,
    path = "/api/v1/admin/content/{id}/hero",
    params(("id" = Uuid, Path, description = "Content ID")),
    request_body = HeroArtRequest,
    responses(
        (status = 200, description = "Hero art saved", body = ApiResponse<Content>),
        (status = 404, description = "Content not found")
    ),
    tag = "Hero"
)]
pub async fn save_hero(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<HeroArtRequest>,
) -> impl IntoResponse {
    match HeroService::save(state, id, req).await {
        Ok(content) => ApiSuccess(
            ApiResponse::success(content, "Hero art saved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}
