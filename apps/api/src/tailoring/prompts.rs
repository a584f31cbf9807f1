// Prompt constants for the LLM tailoring backend.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for tailoring.
/// Combined with `JSON_ONLY_SYSTEM` at call time.
pub const TAILOR_SYSTEM: &str = "You are an expert résumé editor who tailors an existing \
    résumé to a target job description by proposing small, independently reviewable edits. \
    Respond with a single JSON object.";

/// Tailoring prompt template.
/// Replace: {grounding_instruction}, {id_instruction}, {tone_json},
///          {bullet_policy}, {resume_json}, {job_description}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

{id_instruction}

TONE for rewritten text:
{tone_json}

NEW BULLETS:
{bullet_policy}

RÉSUMÉ (source of truth):
{resume_json}

JOB DESCRIPTION:
{job_description}

Return a JSON object with this EXACT schema (no extra fields):
{
  "optimizedResumeDocument": { ...the full résumé with ALL edits below applied, same shape as the input... },
  "changeList": [
    {"op": "update_title", "next": "Senior Backend Engineer", "prev": "Backend Engineer"},
    {"op": "update_summary", "next": "…", "prev": "…"},
    {"op": "update_bullet", "sectionId": "s1", "bulletId": "b1", "nextText": "…", "prevText": "…"},
    {"op": "add_bullet_after", "sectionId": "s1", "afterBulletId": "b1", "bullet": {"id": "b1-new-1", "text": "…"}},
    {"op": "add_skill", "keyword": "Kubernetes"}
  ],
  "atsPreview": {"beforeScore": 54, "afterScore": 81},
  "warnings": []
}

HARD RULES:
1. `op` MUST be one of: update_title, update_summary, update_bullet, add_bullet_after, add_skill
2. Every `sectionId` / `bulletId` / `afterBulletId` MUST be an id that exists in the résumé above
3. `afterBulletId` may be null to insert at the top of the section
4. Each change must stand alone — the user may accept any subset, in any combination
5. Scores are 0–100 estimates of ATS compatibility before and after ALL edits
6. Use `warnings` for anything the user should double-check"#;

pub const NEW_BULLETS_DISALLOWED: &str =
    "Do NOT propose any add_bullet_after changes. Only rewrite existing content.";

/// Replace: {max}
pub const NEW_BULLETS_LIMIT: &str =
    "You may propose at most {max} add_bullet_after changes in total.";

pub const NEW_BULLETS_UNLIMITED: &str =
    "Propose add_bullet_after changes only where the résumé clearly supports them.";
