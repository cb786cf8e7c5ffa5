// Shared prompt fragments. Each feature that calls the LLM keeps its own
// prompts.rs alongside it; cross-cutting instructions live here.

/// Instruction appended to every generation prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    Do NOT invent skills, tools, employers, or years of experience. \
    ONLY reference technologies explicitly listed in the CV facts. \
    If a required job skill is missing from the CV facts, mention willingness to learn instead.";

/// Instruction forcing plain-text output.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Plain text only: no markdown, no bullet points, no headings.";
