// AI tailoring: the external service seam and the request lifecycle around it.
// All LLM calls go through llm_client — no direct Anthropic API calls here.

pub mod prompts;
pub mod service;
pub mod session;
pub mod tone;
