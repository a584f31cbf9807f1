use std::sync::Arc;

use crate::config::Config;
use crate::tailoring::service::TailoringService;
use crate::workspace::WorkspaceStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable tailoring backend. Default: LlmTailoringService.
    pub tailor: Arc<dyn TailoringService>,
    /// In-memory workspaces and editor handoffs.
    pub workspaces: Arc<WorkspaceStore>,
}
