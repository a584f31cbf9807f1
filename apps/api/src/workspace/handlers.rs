//! Axum route handlers for workspaces, selection, merge and editor handoff.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::changes::merge::{merge, MergeOutcome};
use crate::changes::selection::SelectionSet;
use crate::changes::validation::parse_change_list;
use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::state::AppState;
use crate::tailoring::service::TailoringOptions;
use crate::tailoring::session::Completion;
use crate::workspace::handoff::EditorHandoff;
use crate::workspace::{Workspace, WorkspaceView};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceRequest {
    pub resume_document: ResumeData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceResponse {
    pub workspace_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub job_description: String,
    #[serde(default)]
    pub options: TailoringOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub cancelled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub base: ResumeData,
    /// Raw, so it goes through the same fail-closed validation as generation output.
    pub change_list: Value,
    /// Indices into `change_list`; omitted means all selected.
    #[serde(default)]
    pub selection: Option<Vec<usize>>,
}

fn workspace_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Workspace {id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/workspaces
pub async fn handle_create_workspace(
    State(state): State<AppState>,
    Json(request): Json<CreateWorkspaceRequest>,
) -> Result<(StatusCode, Json<CreateWorkspaceResponse>), AppError> {
    let workspace = Workspace::new(request.resume_document)?;
    let workspace_id = state.workspaces.insert(workspace).await;
    info!("Created workspace {workspace_id}");

    Ok((
        StatusCode::CREATED,
        Json(CreateWorkspaceResponse { workspace_id }),
    ))
}

/// GET /api/v1/workspaces/:id
pub async fn handle_get_workspace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkspaceView>, AppError> {
    state
        .workspaces
        .read(id, Workspace::view)
        .await
        .map(Json)
        .ok_or_else(|| workspace_not_found(id))
}

/// POST /api/v1/workspaces/:id/generate
///
/// Runs one tailoring round trip. The workspace lock is released while the
/// service is called; if another generate or a cancel lands meanwhile, this
/// response is discarded and 409 is returned.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<WorkspaceView>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "jobDescription cannot be empty".to_string(),
        ));
    }

    let mut options = request.options;
    options
        .max_new_bullets
        .get_or_insert(state.config.max_new_bullets);

    let (token, tailoring_request) = state
        .workspaces
        .update(id, |ws| ws.begin_generation(request.job_description, options))
        .await
        .ok_or_else(|| workspace_not_found(id))?;

    let result = state
        .tailor
        .tailor(&tailoring_request)
        .await
        .map(|response| response.constrain(&tailoring_request.options));

    let job_description = tailoring_request.job_description;
    state
        .workspaces
        .update(id, |ws| match ws.complete_generation(token, job_description, result) {
            Completion::Published => Ok(Json(ws.view())),
            Completion::Failed(e) => Err(AppError::Tailoring(e.to_string())),
            Completion::Discarded => Err(AppError::Conflict(format!(
                "Generation request {token} was superseded or cancelled"
            ))),
        })
        .await
        .ok_or_else(|| workspace_not_found(id))?
}

/// POST /api/v1/workspaces/:id/cancel
pub async fn handle_cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelResponse>, AppError> {
    let cancelled = state
        .workspaces
        .update(id, |ws| ws.session_mut().cancel().is_some())
        .await
        .ok_or_else(|| workspace_not_found(id))?;

    Ok(Json(CancelResponse { cancelled }))
}

/// POST /api/v1/workspaces/:id/selection/all
pub async fn handle_select_all(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkspaceView>, AppError> {
    update_selection(&state, id, SelectionSet::select_all).await
}

/// POST /api/v1/workspaces/:id/selection/clear
pub async fn handle_clear_selection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkspaceView>, AppError> {
    update_selection(&state, id, SelectionSet::clear_all).await
}

/// POST /api/v1/workspaces/:id/selection/:index/toggle
///
/// Out-of-range indices are ignored; the unchanged view is returned.
pub async fn handle_toggle(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<WorkspaceView>, AppError> {
    update_selection(&state, id, |selection| {
        selection.toggle(index);
    })
    .await
}

async fn update_selection(
    state: &AppState,
    id: Uuid,
    change: impl FnOnce(&mut SelectionSet),
) -> Result<Json<WorkspaceView>, AppError> {
    state
        .workspaces
        .update(id, |ws| {
            change(ws.session_mut().selection_mut());
            Json(ws.view())
        })
        .await
        .ok_or_else(|| workspace_not_found(id))
}

/// GET /api/v1/workspaces/:id/merged
pub async fn handle_get_merged(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MergeOutcome>, AppError> {
    state
        .workspaces
        .read(id, Workspace::merged)
        .await
        .map(Json)
        .ok_or_else(|| workspace_not_found(id))
}

/// POST /api/v1/workspaces/:id/handoff
pub async fn handle_create_handoff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<EditorHandoff>), AppError> {
    let handoff = state
        .workspaces
        .read(id, EditorHandoff::from_workspace)
        .await
        .ok_or_else(|| workspace_not_found(id))?;

    state.workspaces.insert_handoff(handoff.clone()).await;
    info!("Workspace {id} handed off to editor");

    Ok((StatusCode::CREATED, Json(handoff)))
}

/// GET /api/v1/handoffs/:token
pub async fn handle_get_handoff(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<Json<EditorHandoff>, AppError> {
    state
        .workspaces
        .handoff(token)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Handoff {token} not found")))
}

/// POST /api/v1/merge
///
/// Stateless merge: base + change list + selection in, document + warnings out.
pub async fn handle_merge(Json(request): Json<MergeRequest>) -> Result<Json<MergeOutcome>, AppError> {
    request.base.check_invariants()?;
    let changes = parse_change_list(&request.change_list)?;

    let selection = match request.selection {
        Some(indices) => SelectionSet::from_indices(changes.len(), indices),
        None => SelectionSet::all(changes.len()),
    };

    Ok(Json(merge(&request.base, &changes, &selection)))
}
