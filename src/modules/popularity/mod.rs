use axum::Router;
use axum::routing::{get, patch, post};
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod ranking;
pub mod service;

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/popularity", get(handler::load_popular).put(handler::commit_popular))
        .route("/popularity/reorder", post(handler::reorder_popular))
        .route("/content/{id}/popular", patch(handler::toggle_popular))
}
