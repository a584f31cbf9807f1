//! The closed catalog of edit operations an AI tailoring pass may propose.

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::models::resume::ResumeBullet;

/// One proposed edit. Wire form is tagged by `op`:
/// `{"op": "update_bullet", "sectionId": "s1", "bulletId": "b1", "nextText": "..."}`.
///
/// `prev` / `prev_text` are provenance for diff display only and are never
/// read by the merge engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ChangeOp {
    UpdateTitle {
        next: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prev: Option<String>,
    },
    UpdateSummary {
        next: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prev: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    UpdateBullet {
        section_id: String,
        bullet_id: String,
        next_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prev_text: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AddBulletAfter {
        section_id: String,
        /// `None` inserts at the top of the section.
        #[serde(default)]
        after_bullet_id: Option<String>,
        bullet: ResumeBullet,
    },
    AddSkill {
        keyword: String,
    },
}

impl ChangeOp {
    /// The wire tag, used in warnings and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeOp::UpdateTitle { .. } => "update_title",
            ChangeOp::UpdateSummary { .. } => "update_summary",
            ChangeOp::UpdateBullet { .. } => "update_bullet",
            ChangeOp::AddBulletAfter { .. } => "add_bullet_after",
            ChangeOp::AddSkill { .. } => "add_skill",
        }
    }
}

/// An immutable, ordered list of operations produced by one generation call.
///
/// Cloning is cheap and shares the underlying list; there is no way to
/// mutate it once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeList(Arc<[ChangeOp]>);

impl ChangeList {
    pub fn new(ops: Vec<ChangeOp>) -> Self {
        Self(ops.into())
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Default for ChangeList {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for ChangeList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl Deref for ChangeList {
    type Target = [ChangeOp];

    fn deref(&self) -> &[ChangeOp] {
        &self.0
    }
}

impl From<Vec<ChangeOp>> for ChangeList {
    fn from(ops: Vec<ChangeOp>) -> Self {
        Self::new(ops)
    }
}
