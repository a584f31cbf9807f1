// Cross-cutting prompt fragments shared by every LLM-backed service.
// Each service keeps its own templates in a prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Never invent experience the candidate does not have.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Only rephrase, reorder emphasis, or surface facts already present in the \
    résumé. Do NOT invent employers, titles, dates, metrics, or technologies. \
    A skill may only be added if the résumé already demonstrates it.";

/// Edits are addressed by id; ids must survive untouched.
pub const ID_STABILITY_INSTRUCTION: &str = "\
    CRITICAL: Every section and bullet carries an `id`. Reference existing content ONLY \
    by those exact ids. Never rename, reuse, or renumber an existing id. New bullets need \
    a fresh id that does not already exist in their section.";
