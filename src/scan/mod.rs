mod dto;
pub mod handlers;
pub mod services;
mod upload;

use crate::state::AppState;
use axum::Router;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    handlers::routes(max_upload_bytes)
}
