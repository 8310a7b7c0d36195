use super::dto::{CommitRequest, ReorderRequest};
use super::ranking::reorder;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::modules::content::model::{Content, PopularItem};
use crate::modules::content::dto::TogglePopularRequest;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// Popular items in rank order, drafts included
#[utoipa::path(
    get,
    path = "/api/v1/admin/popularity",
    responses(
        (status = 200, description = "Popular items", body = ApiResponse<Vec<PopularItem>>),
        (status = 503, description = "Content store unavailable")
    ),
    tag = "Popularity"
)]
pub async fn load_popular(State(state): State<AppState>) -> impl IntoResponse {
    match state.ranking.load_popular().await {
        Ok(items) => ApiSuccess(
            ApiResponse::success(items, "Popular items retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}

/// Move one item inside a working copy of the ranking
#[utoipa::path(
    post,
    path = "/api/v1/admin/popularity/reorder",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Reordered working copy", body = ApiResponse<Vec<PopularItem>>)
    ),
    tag = "Popularity"
)]
pub async fn reorder_popular(Json(req): Json<ReorderRequest>) -> impl IntoResponse {
    let items = reorder(&req.items, req.from_index, req.to_index);
    ApiSuccess(ApiResponse::success(items, "Order updated"), StatusCode::OK).into_response()
}

/// Persist a popular order as ranks 1..N
#[utoipa::path(
    put,
    path = "/api/v1/admin/popularity",
    request_body = CommitRequest,
    responses(
        (status = 200, description = "Ranking saved", body = ApiResponse<Vec<PopularItem>>),
        (status = 400, description = "Order is not exactly the popular set"),
        (status = 409, description = "Another save is running"),
        (status = 502, description = "Saved partially, retry the same order")
    ),
    tag = "Popularity"
)]
pub async fn commit_popular(
    State(state): State<AppState>,
    Json(req): Json<CommitRequest>,
) -> impl IntoResponse {
    match state.ranking.commit(&req.order).await {
        Ok(items) => ApiSuccess(
            ApiResponse::success(items, "Popular ranking saved"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}

/// Mark or unmark a title as popular
#[utoipa::path(
    patch,
    path = "/api/v1/admin/content/{id}/popular",
    params(("id" = Uuid, Path, description = "Content ID")),
    request_body = TogglePopularRequest,
    responses(
        (status = 200, description = "Popularity updated", body = ApiResponse<Content>),
        (status = 404, description = "Content not found"),
        (status = 409, description = "A ranking save is running")
    ),
    tag = "Popularity"
)]
pub async fn toggle_popular(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TogglePopularRequest>,
) -> impl IntoResponse {
    match state.ranking.set_popular(id, req.is_popular).await {
        Ok(content) => ApiSuccess(
            ApiResponse::success(content, "Popularity updated"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}
