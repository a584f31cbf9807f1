//! Change-list validation.
//!
//! Structural problems reject the whole list (fail-closed): nothing from a
//! malformed payload is ever published. Dangling references are NOT errors
//! here; a document may legitimately change between generation and merge,
//! so those are reported as advisories and skipped at merge time.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::changes::ops::{ChangeList, ChangeOp};
use crate::models::resume::ResumeData;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeListError {
    #[error("change list must be a JSON array, got {0}")]
    NotAnArray(&'static str),

    #[error("change {index} is malformed: {message}")]
    Malformed { index: usize, message: String },

    #[error("change {index} ({kind}) has a blank `{field}`")]
    BlankField {
        index: usize,
        kind: &'static str,
        field: &'static str,
    },
}

/// Parses and validates a raw change list. Any failure rejects every op.
pub fn parse_change_list(raw: &Value) -> Result<ChangeList, ChangeListError> {
    let items = raw
        .as_array()
        .ok_or_else(|| ChangeListError::NotAnArray(json_type_name(raw)))?;

    let mut ops = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let op = ChangeOp::deserialize(item).map_err(|e| ChangeListError::Malformed {
            index,
            message: e.to_string(),
        })?;
        check_op(index, &op)?;
        ops.push(op);
    }

    Ok(ChangeList::new(ops))
}

fn check_op(index: usize, op: &ChangeOp) -> Result<(), ChangeListError> {
    let blank = |field: &'static str| ChangeListError::BlankField {
        index,
        kind: op.kind(),
        field,
    };

    match op {
        ChangeOp::UpdateTitle { .. } | ChangeOp::UpdateSummary { .. } => Ok(()),
        ChangeOp::UpdateBullet {
            section_id,
            bullet_id,
            ..
        } => {
            if section_id.trim().is_empty() {
                return Err(blank("sectionId"));
            }
            if bullet_id.trim().is_empty() {
                return Err(blank("bulletId"));
            }
            Ok(())
        }
        ChangeOp::AddBulletAfter {
            section_id,
            after_bullet_id,
            bullet,
        } => {
            if section_id.trim().is_empty() {
                return Err(blank("sectionId"));
            }
            // `null` means "insert at top"; an empty string is neither.
            if after_bullet_id
                .as_deref()
                .is_some_and(|id| id.trim().is_empty())
            {
                return Err(blank("afterBulletId"));
            }
            if bullet.id.trim().is_empty() {
                return Err(blank("bullet.id"));
            }
            Ok(())
        }
        ChangeOp::AddSkill { keyword } => {
            if keyword.trim().is_empty() {
                return Err(blank("keyword"));
            }
            Ok(())
        }
    }
}

/// Lists references in `ops` that do not resolve against `base` right now.
/// Advisory only; the merge engine makes the binding decision per op.
pub fn referential_report(ops: &[ChangeOp], base: &ResumeData) -> Vec<String> {
    let mut report = Vec::new();

    for (index, op) in ops.iter().enumerate() {
        match op {
            ChangeOp::UpdateTitle { .. }
            | ChangeOp::UpdateSummary { .. }
            | ChangeOp::AddSkill { .. } => {}
            ChangeOp::UpdateBullet {
                section_id,
                bullet_id,
                ..
            } => match base.find_section(section_id) {
                None => report.push(format!("change {index}: section {section_id} not found")),
                Some(section) if !section.contains_bullet(bullet_id) => report.push(format!(
                    "change {index}: bullet {bullet_id} not found in section {section_id}"
                )),
                Some(_) => {}
            },
            ChangeOp::AddBulletAfter {
                section_id,
                after_bullet_id,
                bullet,
            } => match base.find_section(section_id) {
                None => report.push(format!("change {index}: section {section_id} not found")),
                Some(section) => {
                    if let Some(anchor) = after_bullet_id {
                        if !section.contains_bullet(anchor) {
                            report.push(format!(
                                "change {index}: anchor bullet {anchor} not found in section {section_id}"
                            ));
                        }
                    }
                    if section.contains_bullet(&bullet.id) {
                        report.push(format!(
                            "change {index}: bullet {} already exists in section {section_id}",
                            bullet.id
                        ));
                    }
                }
            },
        }
    }

    report
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ResumeBullet, ResumeSection};
    use serde_json::json;

    fn base() -> ResumeData {
        let mut section = ResumeSection::new("s1", "Experience");
        section.bullets.push(ResumeBullet::new("b1", "Did thing"));
        ResumeData {
            title: "Engineer".to_string(),
            sections: vec![section],
            ..Default::default()
        }
    }

    #[test]
    fn test_parses_all_five_kinds_in_order() {
        let list = parse_change_list(&json!([
            {"op": "update_title", "next": "Engineer II", "prev": "Engineer"},
            {"op": "update_summary", "next": "Ships systems"},
            {"op": "update_bullet", "sectionId": "s1", "bulletId": "b1", "nextText": "Did it faster"},
            {"op": "add_bullet_after", "sectionId": "s1", "afterBulletId": "b1",
             "bullet": {"id": "b2", "text": "New achievement"}},
            {"op": "add_skill", "keyword": "Kubernetes"}
        ]))
        .unwrap();

        let kinds: Vec<&str> = list.iter().map(ChangeOp::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "update_title",
                "update_summary",
                "update_bullet",
                "add_bullet_after",
                "add_skill"
            ]
        );
    }

    #[test]
    fn test_unknown_kind_rejects_entire_list() {
        let err = parse_change_list(&json!([
            {"op": "update_title", "next": "Engineer II"},
            {"op": "remove_section", "sectionId": "s1"}
        ]))
        .unwrap_err();

        assert!(matches!(err, ChangeListError::Malformed { index: 1, .. }));
    }

    #[test]
    fn test_missing_field_rejects() {
        let err = parse_change_list(&json!([{"op": "update_bullet", "sectionId": "s1"}]))
            .unwrap_err();
        assert!(matches!(err, ChangeListError::Malformed { index: 0, .. }));
    }

    #[test]
    fn test_non_array_rejects() {
        assert_eq!(
            parse_change_list(&json!({"op": "add_skill"})),
            Err(ChangeListError::NotAnArray("an object"))
        );
    }

    #[test]
    fn test_blank_fields_reject() {
        let err = parse_change_list(&json!([{"op": "add_skill", "keyword": "  "}])).unwrap_err();
        assert_eq!(
            err,
            ChangeListError::BlankField {
                index: 0,
                kind: "add_skill",
                field: "keyword"
            }
        );

        let err = parse_change_list(&json!([
            {"op": "add_bullet_after", "sectionId": "s1", "afterBulletId": "",
             "bullet": {"id": "b2", "text": "x"}}
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ChangeListError::BlankField {
                field: "afterBulletId",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_after_bullet_id_means_top() {
        let list = parse_change_list(&json!([
            {"op": "add_bullet_after", "sectionId": "s1", "bullet": {"id": "b0", "text": "x"}}
        ]))
        .unwrap();
        assert!(matches!(
            &list[0],
            ChangeOp::AddBulletAfter {
                after_bullet_id: None,
                ..
            }
        ));
    }

    #[test]
    fn test_dangling_references_parse_and_are_reported() {
        let list = parse_change_list(&json!([
            {"op": "update_bullet", "sectionId": "s1", "bulletId": "bXXX", "nextText": "..."},
            {"op": "update_bullet", "sectionId": "s9", "bulletId": "b1", "nextText": "..."},
            {"op": "add_bullet_after", "sectionId": "s1", "afterBulletId": "b1",
             "bullet": {"id": "b1", "text": "dup"}},
            {"op": "update_bullet", "sectionId": "s1", "bulletId": "b1", "nextText": "fine"}
        ]))
        .unwrap();

        let report = referential_report(&list, &base());
        assert_eq!(report.len(), 3);
        assert!(report[0].contains("bXXX"));
        assert!(report[1].contains("s9"));
        assert!(report[2].contains("already exists"));
    }
}
