// Resume analysis: prompt, wire call via llm_client, JSON extraction and the
// sanitized result schema.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod analyzer;
pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod schema;
