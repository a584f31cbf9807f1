//! Résumé document model — sections of bullets, addressed by stable ids.
//!
//! Documents are plain data. The helpers here never mutate their inputs;
//! anything that changes structure returns a new value.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Opaque per-node rendering parameters. Ordered so serialization is stable.
pub type Params = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeBullet {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: Params,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Rendering order, and the anchor order for `add_bullet_after`.
    #[serde(default)]
    pub bullets: Vec<ResumeBullet>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: Params,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary: String,
    #[serde(default)]
    pub sections: Vec<ResumeSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_visible: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("duplicate section id '{0}'")]
    DuplicateSection(String),

    #[error("duplicate bullet id '{bullet_id}' in section '{section_id}'")]
    DuplicateBullet {
        section_id: String,
        bullet_id: String,
    },
}

/// Why `insert_bullet_after` refused an insertion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    #[error("anchor bullet '{0}' not found")]
    AnchorNotFound(String),

    #[error("bullet id '{0}' already exists")]
    DuplicateId(String),
}

impl ResumeBullet {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            params: Params::new(),
        }
    }
}

impl ResumeSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            bullets: Vec::new(),
            params: Params::new(),
        }
    }

    /// Locates a bullet by id, returning its position and the bullet.
    pub fn find_bullet(&self, bullet_id: &str) -> Option<(usize, &ResumeBullet)> {
        self.bullets
            .iter()
            .enumerate()
            .find(|(_, b)| b.id == bullet_id)
    }

    pub fn contains_bullet(&self, bullet_id: &str) -> bool {
        self.find_bullet(bullet_id).is_some()
    }

    /// Returns a copy of this section with `bullet` inserted directly after
    /// `after_id`, or at the top when `after_id` is `None`.
    ///
    /// Ids are never renamed: an incoming id that already exists is refused.
    pub fn insert_bullet_after(
        &self,
        after_id: Option<&str>,
        bullet: ResumeBullet,
    ) -> Result<ResumeSection, InsertError> {
        if self.contains_bullet(&bullet.id) {
            return Err(InsertError::DuplicateId(bullet.id));
        }

        let position = match after_id {
            None => 0,
            Some(anchor) => {
                let (index, _) = self
                    .find_bullet(anchor)
                    .ok_or_else(|| InsertError::AnchorNotFound(anchor.to_string()))?;
                index + 1
            }
        };

        let mut next = self.clone();
        next.bullets.insert(position, bullet);
        Ok(next)
    }

    /// Skills sections are discovered by title ("Technical Skills", "SKILLS", ...).
    pub fn is_skills(&self) -> bool {
        self.title.to_lowercase().contains("skill")
    }
}

impl ResumeData {
    pub fn find_section(&self, section_id: &str) -> Option<&ResumeSection> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn find_section_index(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == section_id)
    }

    /// Section ids unique document-wide, bullet ids unique per section.
    pub fn check_invariants(&self) -> Result<(), DocumentError> {
        let mut section_ids = HashSet::new();
        for section in &self.sections {
            if !section_ids.insert(section.id.as_str()) {
                return Err(DocumentError::DuplicateSection(section.id.clone()));
            }

            let mut bullet_ids = HashSet::new();
            for bullet in &section.bullets {
                if !bullet_ids.insert(bullet.id.as_str()) {
                    return Err(DocumentError::DuplicateBullet {
                        section_id: section.id.clone(),
                        bullet_id: bullet.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Scalar text fields are never null in output; a JSON `null` reads as "".
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn experience() -> ResumeSection {
        let mut section = ResumeSection::new("s1", "Experience");
        section.bullets = vec![
            ResumeBullet::new("b1", "Did thing"),
            ResumeBullet::new("b2", "Did other thing"),
        ];
        section
    }

    #[test]
    fn test_find_bullet_returns_index() {
        let section = experience();
        let (index, bullet) = section.find_bullet("b2").unwrap();
        assert_eq!(index, 1);
        assert_eq!(bullet.text, "Did other thing");
        assert!(section.find_bullet("missing").is_none());
    }

    #[test]
    fn test_insert_after_anchor_leaves_input_untouched() {
        let section = experience();
        let next = section
            .insert_bullet_after(Some("b1"), ResumeBullet::new("b3", "New"))
            .unwrap();

        let ids: Vec<&str> = next.bullets.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b3", "b2"]);
        assert_eq!(section, experience());
    }

    #[test]
    fn test_insert_with_null_anchor_goes_to_top() {
        let next = experience()
            .insert_bullet_after(None, ResumeBullet::new("b0", "First"))
            .unwrap();
        assert_eq!(next.bullets[0].id, "b0");
        assert_eq!(next.bullets.len(), 3);
    }

    #[test]
    fn test_insert_refuses_missing_anchor_and_duplicate_id() {
        let section = experience();
        assert_eq!(
            section.insert_bullet_after(Some("nope"), ResumeBullet::new("b3", "x")),
            Err(InsertError::AnchorNotFound("nope".to_string()))
        );
        assert_eq!(
            section.insert_bullet_after(Some("b1"), ResumeBullet::new("b2", "x")),
            Err(InsertError::DuplicateId("b2".to_string()))
        );
    }

    #[test]
    fn test_is_skills_is_case_insensitive_substring() {
        assert!(ResumeSection::new("a", "Technical SKILLS").is_skills());
        assert!(ResumeSection::new("a", "Skillset").is_skills());
        assert!(!ResumeSection::new("a", "Experience").is_skills());
    }

    #[test]
    fn test_check_invariants_detects_duplicates() {
        let mut doc = ResumeData {
            sections: vec![experience(), ResumeSection::new("s2", "Education")],
            ..Default::default()
        };
        assert!(doc.check_invariants().is_ok());

        doc.sections[1].id = "s1".to_string();
        assert_eq!(
            doc.check_invariants(),
            Err(DocumentError::DuplicateSection("s1".to_string()))
        );

        doc.sections[1].id = "s2".to_string();
        doc.sections[0].bullets[1].id = "b1".to_string();
        assert!(matches!(
            doc.check_invariants(),
            Err(DocumentError::DuplicateBullet { .. })
        ));
    }

    #[test]
    fn test_deserializes_camel_case_and_null_scalars() {
        let doc: ResumeData = serde_json::from_value(json!({
            "name": "Ada",
            "title": null,
            "summary": "Builds things",
            "sections": [{"id": "s1", "title": "Experience", "bullets": [
                {"id": "b1", "text": "Did thing", "params": {"bold": true}}
            ]}],
            "fieldsVisible": {"phone": false}
        }))
        .unwrap();

        assert_eq!(doc.title, "");
        assert_eq!(doc.email, "");
        assert_eq!(doc.sections[0].bullets[0].params["bold"], json!(true));
        assert_eq!(doc.fields_visible.unwrap()["phone"], false);
    }
}
