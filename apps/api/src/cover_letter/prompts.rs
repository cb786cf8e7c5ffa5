use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};
use std::sync::LazyLock;

pub const COVER_LETTER_SYSTEM: &str =
    "You are an expert career assistant. Write a tailored cover letter in plain text.";

const COVER_LETTER_BODY: &str = r#"Constraints:
- Tone: {tone}
- 180-240 words
- Do NOT say "previous role" unless a role appears in experience highlights
- Do NOT copy sentences from the job description

Job:
Title: {job_title}
Company: {company}
Job Description: {job_description}

CV facts:
Skills: {skills}
Experience highlights: {experience}

Output format:
- Start with "Dear Hiring Manager,"
- End with "Kind regards," then "[Your Name]""#;

/// Placeholders: {tone} {job_title} {company} {job_description} {skills} {experience}
pub static COVER_LETTER_PROMPT_TEMPLATE: LazyLock<String> = LazyLock::new(|| {
    format!("{COVER_LETTER_BODY}\n\n{GROUNDING_INSTRUCTION}\n{PLAIN_TEXT_INSTRUCTION}")
});
