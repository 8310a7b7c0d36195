use axum::Router;
use axum::routing::post;
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod service;

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/media", post(handler::upload_image).delete(handler::delete_image))
}
