//! Tailoring service — the external AI that proposes a change list.
//!
//! Pluggable behind the `TailoringService` trait; `AppState` carries an
//! `Arc<dyn TailoringService>`. Default backend: `LlmTailoringService`.
//!
//! Whatever the backend returns is schema-checked here before it can reach
//! a session. A malformed response is a hard failure; nothing is published.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::changes::ats::AtsPreview;
use crate::changes::ops::{ChangeList, ChangeOp};
use crate::changes::validation::{parse_change_list, ChangeListError};
use crate::llm_client::prompts::{
    GROUNDING_INSTRUCTION, ID_STABILITY_INSTRUCTION, JSON_ONLY_SYSTEM,
};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::resume::{DocumentError, ResumeData};
use crate::tailoring::prompts::{
    NEW_BULLETS_DISALLOWED, NEW_BULLETS_LIMIT, NEW_BULLETS_UNLIMITED, TAILOR_PROMPT_TEMPLATE,
    TAILOR_SYSTEM,
};
use crate::tailoring::tone::{tone_guidance, Tone};

// ────────────────────────────────────────────────────────────────────────────
// Request / response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoringOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_new_bullets: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_new_bullets: Option<u32>,
}

impl TailoringOptions {
    pub fn allows_new_bullets(&self) -> bool {
        self.allow_new_bullets.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoringRequest {
    pub resume_document: ResumeData,
    pub job_description: String,
    #[serde(default)]
    pub options: TailoringOptions,
}

/// A validated tailoring result, ready to be published by a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoringResponse {
    pub optimized_resume_document: ResumeData,
    pub change_list: ChangeList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ats_preview: Option<AtsPreview>,
    pub warnings: Vec<String>,
}

/// Wire shape before validation. `changeList` stays raw so the fail-closed
/// validator sees every entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTailoringResponse {
    optimized_resume_document: ResumeData,
    change_list: Value,
    #[serde(default)]
    ats_preview: Option<AtsPreview>,
    #[serde(default)]
    warnings: Vec<String>,
}

#[derive(Debug, Error)]
pub enum TailorError {
    #[error("tailoring service unavailable: {0}")]
    Transport(String),

    #[error("tailoring response is malformed: {0}")]
    Schema(String),

    #[error("tailoring response has an invalid change list: {0}")]
    ChangeList(#[from] ChangeListError),

    #[error("tailoring response has an invalid optimized document: {0}")]
    Document(#[from] DocumentError),
}

impl From<LlmError> for TailorError {
    fn from(e: LlmError) -> Self {
        if e.is_output_error() {
            TailorError::Schema(e.to_string())
        } else {
            TailorError::Transport(e.to_string())
        }
    }
}

impl TailoringResponse {
    /// Validates a raw service payload. Any structural problem rejects the
    /// whole response.
    pub fn from_value(value: Value) -> Result<Self, TailorError> {
        let raw: RawTailoringResponse =
            serde_json::from_value(value).map_err(|e| TailorError::Schema(e.to_string()))?;

        let change_list = parse_change_list(&raw.change_list)?;
        raw.optimized_resume_document.check_invariants()?;

        Ok(Self {
            optimized_resume_document: raw.optimized_resume_document,
            change_list,
            ats_preview: raw.ats_preview,
            warnings: raw.warnings,
        })
    }

    /// Drops `add_bullet_after` ops the request's options do not permit,
    /// recording what was dropped in `warnings`. Runs before publication;
    /// the resulting list is final.
    pub fn constrain(self, options: &TailoringOptions) -> Self {
        let limit = if options.allows_new_bullets() {
            options.max_new_bullets.map(|m| m as usize)
        } else {
            Some(0)
        };
        let Some(limit) = limit else {
            return self;
        };

        let mut kept_new = 0usize;
        let mut dropped = 0usize;
        let ops: Vec<ChangeOp> = self
            .change_list
            .iter()
            .filter(|op| {
                if !matches!(op, ChangeOp::AddBulletAfter { .. }) {
                    return true;
                }
                if kept_new < limit {
                    kept_new += 1;
                    true
                } else {
                    dropped += 1;
                    false
                }
            })
            .cloned()
            .collect();

        if dropped == 0 {
            return self;
        }

        let mut warnings = self.warnings;
        warnings.push(if options.allows_new_bullets() {
            format!("Dropped {dropped} proposed new bullet(s) beyond the limit of {limit}")
        } else {
            format!("Dropped {dropped} proposed new bullet(s); new bullets were not allowed")
        });

        Self {
            change_list: ChangeList::new(ops),
            warnings,
            ..self
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The tailoring service trait. Implement this to swap backends without
/// touching the session, handlers, or merge engine.
#[async_trait]
pub trait TailoringService: Send + Sync {
    async fn tailor(&self, request: &TailoringRequest) -> Result<TailoringResponse, TailorError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmTailoringService — default backend
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmTailoringService {
    llm: LlmClient,
}

impl LlmTailoringService {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TailoringService for LlmTailoringService {
    async fn tailor(&self, request: &TailoringRequest) -> Result<TailoringResponse, TailorError> {
        let prompt = build_tailor_prompt(request)?;
        debug!("Tailoring prompt is {} bytes", prompt.len());

        let system = format!("{TAILOR_SYSTEM} {JSON_ONLY_SYSTEM}");
        let value: Value = self.llm.call_json(&prompt, &system).await?;
        let response = TailoringResponse::from_value(value)?;

        info!(
            "Tailoring returned {} changes, {} service warnings",
            response.change_list.len(),
            response.warnings.len()
        );
        Ok(response)
    }
}

/// Builds the tailoring prompt by filling the template.
fn build_tailor_prompt(request: &TailoringRequest) -> Result<String, TailorError> {
    let resume_json = serde_json::to_string_pretty(&request.resume_document)
        .map_err(|e| TailorError::Schema(format!("Failed to serialize résumé: {e}")))?;

    let tone = request.options.tone.unwrap_or_default();
    let tone_json = serde_json::to_string(&tone_guidance(tone))
        .map_err(|e| TailorError::Schema(format!("Failed to serialize tone: {e}")))?;

    let bullet_policy = match (
        request.options.allows_new_bullets(),
        request.options.max_new_bullets,
    ) {
        (false, _) => NEW_BULLETS_DISALLOWED.to_string(),
        (true, Some(max)) => NEW_BULLETS_LIMIT.replace("{max}", &max.to_string()),
        (true, None) => NEW_BULLETS_UNLIMITED.to_string(),
    };

    Ok(TAILOR_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{id_instruction}", ID_STABILITY_INSTRUCTION)
        .replace("{tone_json}", &tone_json)
        .replace("{bullet_policy}", &bullet_policy)
        .replace("{resume_json}", &resume_json)
        .replace("{job_description}", &request.job_description))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
