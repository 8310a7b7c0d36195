use axum::Router;
use axum::routing::patch;
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod service;

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/content/{id}/hero", patch(handler::save_hero))
}
