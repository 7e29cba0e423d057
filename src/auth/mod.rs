use axum::Router;

use crate::state::AppState;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod session;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
