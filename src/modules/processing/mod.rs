use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;

pub mod dto;
pub mod handler;
pub mod service;

// Axum's default 2 MB body limit is far too small for video uploads.
const MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add-emoji", post(handler::add_emoji))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
