pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::workspace::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless merge
        .route("/api/v1/merge", post(handlers::handle_merge))
        // Workspaces
        .route(
            "/api/v1/workspaces",
            post(handlers::handle_create_workspace),
        )
        .route("/api/v1/workspaces/:id", get(handlers::handle_get_workspace))
        .route(
            "/api/v1/workspaces/:id/generate",
            post(handlers::handle_generate),
        )
        .route("/api/v1/workspaces/:id/cancel", post(handlers::handle_cancel))
        .route(
            "/api/v1/workspaces/:id/merged",
            get(handlers::handle_get_merged),
        )
        // Selection
        .route(
            "/api/v1/workspaces/:id/selection/all",
            post(handlers::handle_select_all),
        )
        .route(
            "/api/v1/workspaces/:id/selection/clear",
            post(handlers::handle_clear_selection),
        )
        .route(
            "/api/v1/workspaces/:id/selection/:index/toggle",
            post(handlers::handle_toggle),
        )
        // Editor handoff
        .route(
            "/api/v1/workspaces/:id/handoff",
            post(handlers::handle_create_handoff),
        )
        .route("/api/v1/handoffs/:token", get(handlers::handle_get_handoff))
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
