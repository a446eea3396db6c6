// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to every system prompt sent through the live classifier.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Respond in plain text only, in exactly the format requested. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Joins a service-specific system prompt with the plain-text fragment.
pub fn with_plain_text_instruction(system: &str) -> String {
    format!("{}\n\n{}", system.trim_end(), PLAIN_TEXT_INSTRUCTION)
}
