//! Workspaces — one immutable base document plus one generation session.
//!
//! The merged document is derived on demand from base + live change list +
//! selection and never stored. Workspaces share nothing with each other and
//! live in process memory only.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::changes::ats::{AtsPreview, AtsScoreView};
use crate::changes::merge::{merge, MergeOutcome, MergeWarning};
use crate::changes::ops::ChangeList;
use crate::changes::validation::referential_report;
use crate::models::resume::{DocumentError, ResumeData};
use crate::tailoring::service::{TailorError, TailoringOptions, TailoringRequest, TailoringResponse};
use crate::tailoring::session::{Completion, GenerationSession, RequestToken};

pub mod handlers;
pub mod handoff;

use handoff::EditorHandoff;

#[derive(Debug)]
pub struct Workspace {
    id: Uuid,
    base: ResumeData,
    session: GenerationSession,
    created_at: DateTime<Utc>,
}

/// Everything a client needs to render a workspace.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub base: ResumeData,
    pub pending: bool,
    pub last_error: Option<String>,
    pub job_description: Option<String>,
    /// Token of the request that produced the live change list.
    pub generation: Option<RequestToken>,
    pub change_list: ChangeList,
    pub selected: Vec<usize>,
    /// The service's fully-applied document, for side-by-side preview.
    pub optimized: Option<ResumeData>,
    pub ats_preview: Option<AtsPreview>,
    pub ats: Option<AtsScoreView>,
    pub service_warnings: Vec<String>,
    pub merged: ResumeData,
    pub merge_warnings: Vec<MergeWarning>,
}

impl Workspace {
    /// Rejects base documents that already violate the id invariants.
    pub fn new(base: ResumeData) -> Result<Self, DocumentError> {
        base.check_invariants()?;
        Ok(Self {
            id: Uuid::new_v4(),
            base,
            session: GenerationSession::new(),
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn base(&self) -> &ResumeData {
        &self.base
    }

    pub fn session(&self) -> &GenerationSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GenerationSession {
        &mut self.session
    }

    /// Issues a request token and snapshots what the service needs.
    pub fn begin_generation(
        &mut self,
        job_description: String,
        options: TailoringOptions,
    ) -> (RequestToken, TailoringRequest) {
        let token = self.session.begin();
        info!("Workspace {} issued generation request {token}", self.id);
        let request = TailoringRequest {
            resume_document: self.base.clone(),
            job_description,
            options,
        };
        (token, request)
    }

    pub fn complete_generation(
        &mut self,
        token: RequestToken,
        job_description: String,
        result: Result<TailoringResponse, TailorError>,
    ) -> Completion {
        let completion = self.session.complete(token, job_description, result);

        if matches!(completion, Completion::Published) {
            let changes = self.session.changes();
            for advisory in referential_report(&changes, &self.base) {
                warn!("Workspace {}: {advisory}", self.id);
            }
            info!(
                "Workspace {} published {} changes from request {token}",
                self.id,
                changes.len()
            );
        }
        completion
    }

    /// Recomputed from the base every time; never composes on a prior result.
    pub fn merged(&self) -> MergeOutcome {
        merge(
            &self.base,
            &self.session.changes(),
            self.session.selection(),
        )
    }

    pub fn view(&self) -> WorkspaceView {
        let MergeOutcome { merged, warnings } = self.merged();
        let current = self.session.current();
        let ats_preview = current.and_then(|g| g.ats_preview.clone());

        WorkspaceView {
            id: self.id,
            created_at: self.created_at,
            base: self.base.clone(),
            pending: self.session.is_pending(),
            last_error: self.session.last_error().map(str::to_string),
            job_description: current.map(|g| g.job_description.clone()),
            generation: current.map(|g| g.token),
            change_list: self.session.changes(),
            selected: self.session.selection().indices().collect(),
            optimized: current.map(|g| g.optimized.clone()),
            ats: ats_preview.as_ref().map(AtsPreview::view),
            ats_preview,
            service_warnings: current
                .map(|g| g.service_warnings.clone())
                .unwrap_or_default(),
            merged,
            merge_warnings: warnings,
        }
    }
}

/// In-memory registry of workspaces and editor handoffs.
///
/// Closures passed to `read`/`update` run under the lock and must not block;
/// the generation call itself happens between two `update`s, never inside one.
#[derive(Debug, Default)]
pub struct WorkspaceStore {
    workspaces: RwLock<HashMap<Uuid, Workspace>>,
    handoffs: RwLock<HashMap<Uuid, EditorHandoff>>,
}

impl WorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, workspace: Workspace) -> Uuid {
        let id = workspace.id();
        self.workspaces.write().await.insert(id, workspace);
        id
    }

    pub async fn read<R>(&self, id: Uuid, f: impl FnOnce(&Workspace) -> R) -> Option<R> {
        self.workspaces.read().await.get(&id).map(f)
    }

    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut Workspace) -> R) -> Option<R> {
        self.workspaces.write().await.get_mut(&id).map(f)
    }

    pub async fn insert_handoff(&self, handoff: EditorHandoff) -> Uuid {
        let token = handoff.token;
        self.handoffs.write().await.insert(token, handoff);
        token
    }

    pub async fn handoff(&self, token: Uuid) -> Option<EditorHandoff> {
        self.handoffs.read().await.get(&token).cloned()
    }
}
