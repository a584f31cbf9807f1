//! Generation session — one request/response cycle at a time against the
//! tailoring service, guarded against out-of-order completion.
//!
//! Every request gets a monotonically increasing token. Only a response
//! carrying the latest in-flight token may publish; anything else (an older
//! request that resolved late, or one the caller cancelled) is discarded
//! without touching the published change list or the selection.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::changes::ats::AtsPreview;
use crate::changes::ops::ChangeList;
use crate::changes::selection::SelectionSet;
use crate::models::resume::ResumeData;
use crate::tailoring::service::{TailorError, TailoringResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The result of one successful generation, as published.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub token: RequestToken,
    pub job_description: String,
    pub changes: ChangeList,
    pub optimized: ResumeData,
    pub ats_preview: Option<AtsPreview>,
    pub service_warnings: Vec<String>,
}

/// What happened to a completed request.
#[derive(Debug)]
pub enum Completion {
    /// A new change list is live and every op is selected.
    Published,
    /// The request failed; the previous state is untouched.
    Failed(TailorError),
    /// Superseded or cancelled; nothing changed.
    Discarded,
}

#[derive(Debug, Default)]
pub struct GenerationSession {
    last_issued: u64,
    in_flight: Option<RequestToken>,
    current: Option<Generation>,
    selection: SelectionSet,
    last_error: Option<String>,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token for a new request. Any request still in flight is
    /// superseded and its response will be discarded.
    pub fn begin(&mut self) -> RequestToken {
        self.last_issued += 1;
        let token = RequestToken(self.last_issued);
        if let Some(previous) = self.in_flight.replace(token) {
            debug!("Request {previous} superseded by {token}");
        }
        token
    }

    /// Abandons the in-flight request, if any. Its response, should it
    /// still arrive, is discarded.
    pub fn cancel(&mut self) -> Option<RequestToken> {
        let cancelled = self.in_flight.take();
        if let Some(token) = cancelled {
            info!("Request {token} cancelled");
        }
        cancelled
    }

    /// Feeds a response back into the session.
    pub fn complete(
        &mut self,
        token: RequestToken,
        job_description: String,
        result: Result<TailoringResponse, TailorError>,
    ) -> Completion {
        if self.in_flight != Some(token) {
            info!(
                "Discarding response for stale request {token} (in flight: {:?})",
                self.in_flight
            );
            return Completion::Discarded;
        }
        self.in_flight = None;

        match result {
            Ok(response) => {
                self.selection = SelectionSet::all(response.change_list.len());
                self.current = Some(Generation {
                    token,
                    job_description,
                    changes: response.change_list,
                    optimized: response.optimized_resume_document,
                    ats_preview: response.ats_preview,
                    service_warnings: response.warnings,
                });
                self.last_error = None;
                Completion::Published
            }
            Err(e) => {
                warn!("Request {token} failed: {e}");
                self.last_error = Some(e.to_string());
                Completion::Failed(e)
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn current(&self) -> Option<&Generation> {
        self.current.as_ref()
    }

    /// The live change list; empty before the first successful generation.
    pub fn changes(&self) -> ChangeList {
        self.current
            .as_ref()
            .map(|g| g.changes.clone())
            .unwrap_or_default()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
