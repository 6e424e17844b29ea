pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::allocator::handlers as allocator;
use crate::layout::handlers as layout;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Layout API
        .route("/api/v1/layout", post(layout::handle_layout))
        .route("/api/v1/layout/presets", get(layout::handle_list_presets))
        .route("/api/v1/layout/markers", post(layout::handle_layout_markers))
        // Allocate API
        .route("/api/v1/allocate", post(allocator::handle_allocate))
        .route("/api/v1/allocate/srt", post(allocator::handle_allocate_srt))
        .with_state(state)
}
