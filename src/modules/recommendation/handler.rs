use super::history::ViewHistoryEntry;
use super::service::RecommendationService;
use super::storage::{load_history, CookieStorage};
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::modules::content::model::Content;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tower_cookies::Cookies;

/// Recently viewed titles, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/history",
    responses(
        (status = 200, description = "View history", body = ApiResponse<Vec<ViewHistoryEntry>>)
    ),
    tag = "Recommendations"
)]
pub async fn get_history(cookies: Cookies) -> impl IntoResponse {
    let history = load_history(&CookieStorage::new(cookies));
    ApiSuccess(
        ApiResponse::success(history.entries().to_vec(), "View history retrieved successfully"),
        StatusCode::OK,
    )
    .into_response()
}

/// Titles that share a genre with the last five viewed
#[utoipa::path(
    get,
    path = "/api/v1/top-picks",
    responses(
        (status = 200, description = "Top picks, empty without history", body = ApiResponse<Vec<Content>>),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Recommendations"
)]
pub async fn top_picks(State(state): State<AppState>, cookies: Cookies) -> impl IntoResponse {
    let history = load_history(&CookieStorage::new(cookies));

    match RecommendationService::top_picks(state, &history).await {
        Ok(items) => ApiSuccess(
            ApiResponse::success(items, "Top picks retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}
