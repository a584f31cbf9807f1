use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::changes::merge::{MergeOutcome, MergeWarning};
use crate::models::resume::ResumeData;
use crate::workspace::Workspace;

/// A merged document plus job context, parked under an opaque token for an
/// external editor to pick up. The snapshot is frozen at creation; later
/// toggles in the workspace do not affect it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorHandoff {
    pub token: Uuid,
    pub workspace_id: Uuid,
    pub merged: ResumeData,
    pub warnings: Vec<MergeWarning>,
    pub job_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EditorHandoff {
    pub fn from_workspace(workspace: &Workspace) -> Self {
        let MergeOutcome { merged, warnings } = workspace.merged();
        Self {
            token: Uuid::new_v4(),
            workspace_id: workspace.id(),
            merged,
            warnings,
            job_description: workspace
                .session()
                .current()
                .map(|g| g.job_description.clone()),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::ops::{ChangeList, ChangeOp};
    use crate::tailoring::service::{TailoringOptions, TailoringResponse};

    #[test]
    fn test_handoff_snapshots_current_merge() {
        let mut ws = Workspace::new(ResumeData {
            summary: "Old summary".to_string(),
            ..Default::default()
        })
        .unwrap();

        let (token, _) = ws.begin_generation("Platform role".to_string(), TailoringOptions::default());
        ws.complete_generation(
            token,
            "Platform role".to_string(),
            Ok(TailoringResponse {
                optimized_resume_document: ResumeData::default(),
                change_list: ChangeList::new(vec![ChangeOp::UpdateSummary {
                    next: "New summary".to_string(),
                    prev: Some("Old summary".to_string()),
                }]),
                ats_preview: None,
                warnings: vec![],
            }),
        );

        let handoff = EditorHandoff::from_workspace(&ws);
        ws.session_mut().selection_mut().clear_all();

        assert_eq!(handoff.merged.summary, "New summary");
        assert_eq!(handoff.job_description.as_deref(), Some("Platform role"));
        assert_eq!(handoff.workspace_id, ws.id());
        assert_eq!(ws.merged().merged.summary, "Old summary");
    }
}
