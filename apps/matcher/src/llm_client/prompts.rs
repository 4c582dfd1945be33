// Shared prompt fragments.
// Each module that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// Instruction appended to every prompt whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
