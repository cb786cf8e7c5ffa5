//! Cover letter writers — pluggable, trait-based.
//!
//! `TemplateWriter` is pure Rust, deterministic and always available.
//! `LlmWriter` delegates to the language model and is only wired in when an
//! API key is configured. Handlers fall back to the template on LLM failure.

use async_trait::async_trait;

use crate::cover_letter::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::LlmClient;

pub const DEFAULT_TONE: &str = "professional";

const TEMPLATE_SKILLS: usize = 6;
const TEMPLATE_EXPERIENCE_LINES: usize = 3;
const TEMPLATE_JD_EXCERPT_CHARS: usize = 220;

const LLM_SKILLS: usize = 10;
const LLM_EXPERIENCE_LINES: usize = 6;
const LLM_MIN_EXPERIENCE_CHARS: usize = 20;
const LLM_JD_MAX_CHARS: usize = 2000;

/// CV facts plus the posting a letter is written for.
#[derive(Debug, Clone)]
pub struct LetterRequest<'a> {
    pub skills: &'a [String],
    pub experience: &'a [String],
    pub job_title: &'a str,
    pub company: &'a str,
    pub job_description: &'a str,
    pub tone: &'a str,
}

#[async_trait]
pub trait CoverLetterWriter: Send + Sync {
    /// Stored alongside the letter: "template" | "llm".
    fn mode(&self) -> &'static str;

    async fn write(&self, request: &LetterRequest<'_>) -> Result<String, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// TemplateWriter
// ────────────────────────────────────────────────────────────────────────────

pub struct TemplateWriter;

#[async_trait]
impl CoverLetterWriter for TemplateWriter {
    fn mode(&self) -> &'static str {
        "template"
    }

    async fn write(&self, request: &LetterRequest<'_>) -> Result<String, AppError> {
        Ok(render_template(request))
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn clean_list(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn summarise_experience(experience: &[String]) -> String {
    let lines: Vec<&str> = clean_list(experience).take(TEMPLATE_EXPERIENCE_LINES).collect();
    if lines.is_empty() {
        return "I have experience in technical and customer-facing roles that align with this position."
            .to_string();
    }
    format!("My background includes {}.", lines.join("; "))
}

fn summarise_skills(skills: &[String]) -> String {
    let top: Vec<&str> = clean_list(skills).take(TEMPLATE_SKILLS).collect();
    if top.is_empty() {
        return "I bring strong problem-solving skills and a willingness to learn quickly.".to_string();
    }
    format!(
        "Some of the key skills I would bring to this role are: {}.",
        top.join(", ")
    )
}

fn render_template(request: &LetterRequest<'_>) -> String {
    let opener = if request.tone.to_lowercase().contains("enthusiastic") {
        "I am excited to apply"
    } else {
        "I am writing to apply"
    };
    let excerpt = truncate_chars(request.job_description.trim(), TEMPLATE_JD_EXCERPT_CHARS);

    format!(
        "Dear Hiring Manager,\n\n\
         {opener} for the {title} position at {company}. After reviewing the job description, \
         I believe my background and experience make me a strong fit for this opportunity.\n\n\
         {experience}\n\
         {skills}\n\n\
         In your job description, you highlight the importance of:\n\
         - {excerpt}...\n\n\
         I am confident that I can quickly ramp up, collaborate effectively with your team, \
         and contribute to delivering a great experience for your users and stakeholders.\n\n\
         Thank you for taking the time to review my application. I would welcome the opportunity \
         to discuss how my experience and skills can support {company}'s goals in more detail.\n\n\
         Kind regards,\n\
         [Your Name]",
        title = request.job_title,
        company = request.company,
        experience = summarise_experience(request.experience),
        skills = summarise_skills(request.skills),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// LlmWriter
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmWriter(pub LlmClient);

#[async_trait]
impl CoverLetterWriter for LlmWriter {
    fn mode(&self) -> &'static str {
        "llm"
    }

    async fn write(&self, request: &LetterRequest<'_>) -> Result<String, AppError> {
        let prompt = build_llm_prompt(request);
        self.0
            .call_text(&prompt, COVER_LETTER_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(e.kind().to_string()))
    }
}

fn build_llm_prompt(request: &LetterRequest<'_>) -> String {
    let skills: Vec<&str> = clean_list(request.skills).take(LLM_SKILLS).collect();
    let experience: Vec<&str> = clean_list(request.experience)
        .take(LLM_EXPERIENCE_LINES)
        .filter(|e| e.chars().count() > LLM_MIN_EXPERIENCE_CHARS)
        .collect();

    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{tone}", request.tone)
        .replace("{job_title}", request.job_title)
        .replace("{company}", request.company)
        .replace(
            "{job_description}",
            truncate_chars(request.job_description.trim(), LLM_JD_MAX_CHARS),
        )
        .replace("{skills}", &skills.join(", "))
        .replace("{experience}", &experience.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn request<'a>(
        skills: &'a [String],
        experience: &'a [String],
        job_description: &'a str,
        tone: &'a str,
    ) -> LetterRequest<'a> {
        LetterRequest {
            skills,
            experience,
            job_title: "Support Engineer",
            company: "Acme",
            job_description,
            tone,
        }
    }

    #[tokio::test]
    async fn test_template_professional_opener() {
        let skills = strings(&["Python", "Sql"]);
        let experience = strings(&["IT Support Intern, Contoso"]);
        let letter = TemplateWriter
            .write(&request(&skills, &experience, "Fix things.", DEFAULT_TONE))
            .await
            .unwrap();

        assert!(letter.starts_with("Dear Hiring Manager,"));
        assert!(letter.contains("I am writing to apply for the Support Engineer position at Acme."));
        assert!(letter.contains("My background includes IT Support Intern, Contoso."));
        assert!(letter.contains("are: Python, Sql."));
        assert!(letter.contains("support Acme's goals"));
        assert!(letter.ends_with("Kind regards,\n[Your Name]"));
    }

    #[tokio::test]
    async fn test_template_enthusiastic_opener() {
        let letter = TemplateWriter
            .write(&request(&[], &[], "x", "Very Enthusiastic"))
            .await
            .unwrap();
        assert!(letter.contains("I am excited to apply"));
    }

    #[test]
    fn test_template_fallback_sentences() {
        let letter = render_template(&request(&[], &[], "x", DEFAULT_TONE));
        assert!(letter.contains("technical and customer-facing roles"));
        assert!(letter.contains("willingness to learn quickly"));
    }

    #[test]
    fn test_template_limits_skills_and_excerpt() {
        let skills = strings(&["A1", "B2", "C3", "D4", "E5", "F6", "G7"]);
        let jd = "é".repeat(500);
        let letter = render_template(&request(&skills, &[], &jd, DEFAULT_TONE));
        assert!(letter.contains("F6."));
        assert!(!letter.contains("G7"));
        assert!(letter.contains(&format!("- {}...", "é".repeat(220))));
        assert!(!letter.contains(&"é".repeat(221)));
    }

    #[test]
    fn test_llm_prompt_filters_short_experience() {
        let skills = strings(&["Python"]);
        let experience = strings(&["Intern", "Software Engineer at Globex, 2021-2023"]);
        let prompt = build_llm_prompt(&request(&skills, &experience, "Build APIs", "warm"));
        assert!(prompt.contains("Tone: warm"));
        assert!(prompt.contains("Skills: Python"));
        assert!(prompt.contains("Experience highlights: Software Engineer at Globex, 2021-2023"));
        assert!(!prompt.contains("Intern |"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
    }
}
