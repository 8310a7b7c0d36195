use axum::Router;
use axum::routing::{get, patch};
use crate::state::AppState;

pub mod cache;
pub mod dto;
pub mod events;
pub mod handler;
pub mod memory;
pub mod model;
pub mod repository;
pub mod service;
pub mod store;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/content", get(handler::list_content))
        .route("/content/{id}", get(handler::get_content))
        .route("/events", get(events::catalog_events))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/content", get(handler::admin_list).post(handler::create_content))
        .route("/content/{id}", patch(handler::update_content).delete(handler::delete_content))
        .route("/stats", get(handler::stats))
}
