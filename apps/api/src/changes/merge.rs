//! Merge engine — applies a selected subset of a change list to a base document.
//!
//! `merge` is pure: same base, list and selection always give the same
//! document and warnings. It always starts from the base, never from an
//! earlier merge result, and never generates random ids or timestamps.
//!
//! Selected ops are applied in list order, not toggle order. An op whose
//! target no longer exists is skipped with a warning and the merge goes on;
//! the worst case is the base document plus warnings.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::warn;

use crate::changes::ops::{ChangeList, ChangeOp};
use crate::changes::selection::SelectionSet;
use crate::models::resume::{InsertError, ResumeBullet, ResumeData, ResumeSection};

/// Title and id given to a Skills section the engine has to create.
pub const SKILLS_SECTION_TITLE: &str = "Skills";
const SKILLS_SECTION_ID: &str = "skills";

/// A selected op that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeWarning {
    SectionNotFound {
        kind: &'static str,
        section_id: String,
    },
    BulletNotFound {
        section_id: String,
        bullet_id: String,
    },
    AnchorNotFound {
        section_id: String,
        anchor_id: String,
    },
    DuplicateBullet {
        section_id: String,
        bullet_id: String,
    },
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeWarning::SectionNotFound { kind, section_id } => {
                write!(f, "{kind}: section {section_id} not found")
            }
            MergeWarning::BulletNotFound {
                section_id,
                bullet_id,
            } => write!(
                f,
                "update_bullet: bullet {bullet_id} not found in section {section_id}"
            ),
            MergeWarning::AnchorNotFound {
                section_id,
                anchor_id,
            } => write!(
                f,
                "add_bullet_after: anchor bullet {anchor_id} not found in section {section_id}"
            ),
            MergeWarning::DuplicateBullet {
                section_id,
                bullet_id,
            } => write!(
                f,
                "add_bullet_after: bullet {bullet_id} already exists in section {section_id}"
            ),
        }
    }
}

impl Serialize for MergeWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub merged: ResumeData,
    pub warnings: Vec<MergeWarning>,
}

/// Computes the document produced by applying the selected ops of `changes`
/// to `base`. `base` is not modified.
pub fn merge(base: &ResumeData, changes: &ChangeList, selection: &SelectionSet) -> MergeOutcome {
    let mut merged = base.clone();
    let mut warnings = Vec::new();

    let selected = changes
        .iter()
        .enumerate()
        .filter(|(index, _)| selection.contains(*index));

    for (index, op) in selected {
        if let Err(warning) = apply(&mut merged, op) {
            warn!("Skipping change {index}: {warning}");
            warnings.push(warning);
        }
    }

    MergeOutcome { merged, warnings }
}

/// Applies one op to the working copy. The single dispatch point over
/// `ChangeOp`; a new kind does not compile until it is handled here.
fn apply(doc: &mut ResumeData, op: &ChangeOp) -> Result<(), MergeWarning> {
    match op {
        ChangeOp::UpdateTitle { next, .. } => {
            doc.title = next.clone();
            Ok(())
        }
        ChangeOp::UpdateSummary { next, .. } => {
            doc.summary = next.clone();
            Ok(())
        }
        ChangeOp::UpdateBullet {
            section_id,
            bullet_id,
            next_text,
            ..
        } => update_bullet(doc, section_id, bullet_id, next_text),
        ChangeOp::AddBulletAfter {
            section_id,
            after_bullet_id,
            bullet,
        } => add_bullet_after(doc, section_id, after_bullet_id.as_deref(), bullet),
        ChangeOp::AddSkill { keyword } => {
            add_skill(doc, keyword);
            Ok(())
        }
    }
}

fn update_bullet(
    doc: &mut ResumeData,
    section_id: &str,
    bullet_id: &str,
    next_text: &str,
) -> Result<(), MergeWarning> {
    let not_found = || MergeWarning::BulletNotFound {
        section_id: section_id.to_string(),
        bullet_id: bullet_id.to_string(),
    };

    let section_index = doc.find_section_index(section_id).ok_or_else(not_found)?;
    let section = &mut doc.sections[section_index];
    let (bullet_index, _) = section.find_bullet(bullet_id).ok_or_else(not_found)?;

    // Text only; params stay as they were.
    section.bullets[bullet_index].text = next_text.to_string();
    Ok(())
}

fn add_bullet_after(
    doc: &mut ResumeData,
    section_id: &str,
    after_bullet_id: Option<&str>,
    bullet: &ResumeBullet,
) -> Result<(), MergeWarning> {
    let section_index =
        doc.find_section_index(section_id)
            .ok_or_else(|| MergeWarning::SectionNotFound {
                kind: "add_bullet_after",
                section_id: section_id.to_string(),
            })?;

    let next = doc.sections[section_index]
        .insert_bullet_after(after_bullet_id, bullet.clone())
        .map_err(|e| match e {
            InsertError::AnchorNotFound(anchor_id) => MergeWarning::AnchorNotFound {
                section_id: section_id.to_string(),
                anchor_id,
            },
            InsertError::DuplicateId(bullet_id) => MergeWarning::DuplicateBullet {
                section_id: section_id.to_string(),
                bullet_id,
            },
        })?;

    doc.sections[section_index] = next;
    Ok(())
}

/// Appends `keyword` to the first skills section, creating a trailing
/// "Skills" section when there is none. Never fails.
fn add_skill(doc: &mut ResumeData, keyword: &str) {
    match doc.sections.iter().position(ResumeSection::is_skills) {
        Some(index) => {
            let section = &mut doc.sections[index];
            let id = unique_id(&skill_bullet_id(keyword), |id| section.contains_bullet(id));
            section.bullets.push(ResumeBullet::new(id, keyword));
        }
        None => {
            let section_id = unique_id(SKILLS_SECTION_ID, |id| doc.find_section(id).is_some());
            let mut section = ResumeSection::new(section_id, SKILLS_SECTION_TITLE);
            section
                .bullets
                .push(ResumeBullet::new(skill_bullet_id(keyword), keyword));
            doc.sections.push(section);
        }
    }
}

/// `skill-<slug>`, derived from the keyword only, so the same input always
/// yields the same id.
fn skill_bullet_id(keyword: &str) -> String {
    let mut slug = String::with_capacity(keyword.len());
    for c in keyword.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        "skill".to_string()
    } else {
        format!("skill-{slug}")
    }
}

/// `base`, or `base-2`, `base-3`, ... — the first one not already taken.
fn unique_id(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
