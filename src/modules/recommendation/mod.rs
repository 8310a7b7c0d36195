use axum::Router;
use axum::routing::get;
use crate::state::AppState;

pub mod engine;
pub mod handler;
pub mod history;
pub mod service;
pub mod storage;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/history", get(handler::get_history))
        .route("/top-picks", get(handler::top_picks))
}
