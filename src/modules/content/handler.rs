use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::modules::content::dto::*;
use crate::modules::content::model::Content;
use crate::modules::content::service::ContentService;
use crate::modules::recommendation::storage::{record_view_in, CookieStorage};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_cookies::Cookies;
use uuid::Uuid;

// --- PUBLIC ---

/// Catalog listing by section, genre or type
#[utoipa::path(
    get,
    path = "/api/v1/content",
    params(CatalogParams),
    responses(
        (status = 200, description = "Published content", body = ApiResponse<Vec<Content>>),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Content"
)]
pub async fn list_content(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> impl IntoResponse {
    let query = ContentService::catalog_query(&params);

    match ContentService::list_catalog(state, query).await {
        Ok(items) => ApiSuccess(
            ApiResponse::success(items, "Content retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}

/// One title plus similar titles. Counts as a view for Top Picks.
#[utoipa::path(
    get,
    path = "/api/v1/content/{id}",
    params(("id" = Uuid, Path, description = "Content ID")),
    responses(
        (status = 200, description = "Content detail", body = ApiResponse<ContentDetailResponse>),
        (status = 404, description = "Content Not Found")
    ),
    tag = "Content"
)]
pub async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    cookies: Cookies,
) -> impl IntoResponse {
    match ContentService::get_detail(state, id).await {
        Ok(detail) => {
            record_view_in(&CookieStorage::new(cookies), detail.content.id, detail.content.genre.clone());
            ApiSuccess(
                ApiResponse::success(detail, "Content retrieved successfully"),
                StatusCode::OK,
            )
            .into_response()
        }
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}

// --- ADMIN ---

/// Every title including drafts
#[utoipa::path(
    get,
    path = "/api/v1/admin/content",
    params(AdminListParams),
    responses(
        (status = 200, description = "All content", body = ApiResponse<Vec<Content>>)
    ),
    tag = "Admin"
)]
pub async fn admin_list(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> impl IntoResponse {
    match ContentService::admin_list(state, params).await {
        Ok(items) => ApiSuccess(
            ApiResponse::success(items, "Content retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    responses(
        (status = 200, description = "Catalog counts", body = ApiResponse<CatalogStats>)
    ),
    tag = "Admin"
)]
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    match ContentService::stats(state).await {
        Ok(stats) => ApiSuccess(
            ApiResponse::success(stats, "Stats retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/content",
    request_body = CreateContentRequest,
    responses(
        (status = 201, description = "Content Created", body = ApiResponse<Content>),
        (status = 400, description = "Bad Request")
    ),
    tag = "Admin"
)]
pub async fn create_content(
    State(state): State<AppState>,
    Json(req): Json<CreateContentRequest>,
) -> impl IntoResponse {
    match ContentService::create(state, req).await {
        Ok(content) => ApiSuccess(
            ApiResponse::success(content, "Content created successfully"),
            StatusCode::CREATED,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}

/// Partial update; unknown fields are ignored
#[utoipa::path(
    patch,
    path = "/api/v1/admin/content/{id}",
    params(("id" = Uuid, Path, description = "Content ID")),
    request_body = ContentPatch,
    responses(
        (status = 200, description = "Content Updated", body = ApiResponse<Content>),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Content Not Found")
    ),
    tag = "Admin"
)]
pub async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ContentPatch>,
) -> impl IntoResponse {
    match ContentService::update(state, id, patch).await {
        Ok(content) => ApiSuccess(
            ApiResponse::success(content, "Content updated successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/content/{id}",
    params(("id" = Uuid, Path, description = "Content ID")),
    responses(
        (status = 200, description = "Content Deleted", body = ApiResponse<DeletedResponse>),
        (status = 404, description = "Content Not Found")
    ),
    tag = "Admin"
)]
pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match ContentService::delete(state, id).await {
        Ok(content) => ApiSuccess(
            ApiResponse::success(DeletedResponse { id: content.id }, "Content deleted successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}
