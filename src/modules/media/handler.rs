use super::dto::{DeleteImageRequest, UploadedImage};
use super::service::{MediaError, MediaService};
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::common::upload::read_image_form;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// Upload an image to media storage
#[utoipa::path(
    post,
    path = "/api/v1/admin/media",
    request_body(content = String, content_type = "multipart/form-data", description = "`file` (image/*) and optional `folder`"),
    responses(
        (status = 201, description = "Image stored", body = ApiResponse<UploadedImage>),
        (status = 400, description = "Missing file or not an image"),
        (status = 503, description = "Media storage not configured")
    ),
    tag = "Media"
)]
pub async fn upload_image(State(state): State<AppState>, multipart: Multipart) -> impl IntoResponse {
    if state.media.is_none() {
        let e = MediaError::Unconfigured;
        return ApiError(e.to_string(), e.status_code()).into_response();
    }

    let form = match read_image_form(multipart).await {
        Ok(form) => form,
        Err(e) => return ApiError::bad_request(e.to_string()).into_response(),
    };

    match MediaService::upload(&state, form).await {
        Ok(image) => ApiSuccess(
            ApiResponse::success(image, "Image uploaded successfully"),
            StatusCode::CREATED,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}

/// Delete a stored image by its publicId
#[utoipa::path(
    delete,
    path = "/api/v1/admin/media",
    request_body = DeleteImageRequest,
    responses(
        (status = 200, description = "Image deleted", body = ApiResponse<String>),
        (status = 400, description = "Missing or unknown publicId"),
        (status = 503, description = "Media storage not configured")
    ),
    tag = "Media"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    Json(req): Json<DeleteImageRequest>,
) -> impl IntoResponse {
    if req.public_id.trim().is_empty() {
        return ApiError::bad_request("Missing publicId").into_response();
    }

    match MediaService::delete(&state, &req.public_id).await {
        Ok(()) => ApiSuccess(
            ApiResponse::success(req.public_id, "Image deleted successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status_code()).into_response(),
    }
}
