//! Axum route handlers for the Cover Letter API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::cover_letter::repository::{
    get_latest_cover_letter, save_cover_letter, NewCoverLetter,
};
use crate::cover_letter::writer::{CoverLetterWriter, LetterRequest, DEFAULT_TONE};
use crate::cv::repository::get_cv_for_user;
use crate::errors::AppError;
use crate::jobs::repository::tracked_job_exists;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub cv_id: Uuid,
    /// Tracked job the letter is attached to.
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub job_description: String,
    pub tone: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
    /// "template" | "llm" | "none"
    pub mode: String,
    pub note: Option<String>,
}

impl CoverLetterResponse {
    fn none() -> Self {
        Self {
            cover_letter: String::new(),
            mode: "none".to_string(),
            note: Some("No cover letter saved for this job yet.".to_string()),
        }
    }
}

struct Drafted {
    text: String,
    mode: &'static str,
    note: Option<String>,
}

/// Tries the LLM writer when configured, falling back to the template on any failure.
async fn draft_letter(
    llm_writer: Option<&dyn CoverLetterWriter>,
    template_writer: &dyn CoverLetterWriter,
    request: &LetterRequest<'_>,
) -> Result<Drafted, AppError> {
    let mut note = None;

    if let Some(writer) = llm_writer {
        match writer.write(request).await {
            Ok(text) => {
                return Ok(Drafted {
                    text,
                    mode: writer.mode(),
                    note: None,
                })
            }
            Err(e) => {
                warn!("LLM cover letter failed, using template: {e}");
                let reason = match e {
                    AppError::Llm(kind) => kind,
                    _ => "internal".to_string(),
                };
                note = Some(format!("LLM generation failed: {reason}"));
            }
        }
    }

    Ok(Drafted {
        text: template_writer.write(request).await?,
        mode: template_writer.mode(),
        note,
    })
}

/// POST /cover-letter/generate
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let cv = get_cv_for_user(&state.db, request.cv_id, &user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("CV not found".to_string()))?;

    if !tracked_job_exists(&state.db, &user.user_id, request.job_id).await? {
        return Err(AppError::NotFound("Tracked job not found".to_string()));
    }

    let tone = request
        .tone
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TONE);

    let letter_request = LetterRequest {
        skills: &cv.skills,
        experience: &cv.experience,
        job_title: &request.job_title,
        company: &request.company,
        job_description: &request.job_description,
        tone,
    };

    let drafted = draft_letter(
        state.llm_writer.as_deref(),
        state.template_writer.as_ref(),
        &letter_request,
    )
    .await?;

    save_cover_letter(
        &state.db,
        NewCoverLetter {
            user_id: &user.user_id,
            cv_id: request.cv_id,
            job_id: request.job_id,
            job_title: &request.job_title,
            company: &request.company,
            tone,
            text: &drafted.text,
            mode: drafted.mode,
            note: drafted.note.as_deref(),
        },
    )
    .await?;

    info!("Generated {} cover letter for job {}", drafted.mode, request.job_id);

    Ok(Json(CoverLetterResponse {
        cover_letter: drafted.text,
        mode: drafted.mode.to_string(),
        note: drafted.note,
    }))
}

/// GET /cover-letter/latest/:job_id
pub async fn handle_latest_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let response = match get_latest_cover_letter(&state.db, &user.user_id, job_id).await? {
        Some(row) => CoverLetterResponse {
            cover_letter: row.text,
            mode: row.mode,
            note: row.note,
        },
        None => CoverLetterResponse::none(),
    };
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::cover_letter::writer::TemplateWriter;

    struct FailingWriter;

    #[async_trait]
    impl CoverLetterWriter for FailingWriter {
        fn mode(&self) -> &'static str {
            "llm"
        }

        async fn write(&self, _request: &LetterRequest<'_>) -> Result<String, AppError> {
            Err(AppError::Llm("rate_limited".to_string()))
        }
    }

    struct FixedWriter;

    #[async_trait]
    impl CoverLetterWriter for FixedWriter {
        fn mode(&self) -> &'static str {
            "llm"
        }

        async fn write(&self, _request: &LetterRequest<'_>) -> Result<String, AppError> {
            Ok("Dear Hiring Manager, generated.".to_string())
        }
    }

    fn letter_request() -> LetterRequest<'static> {
        LetterRequest {
            skills: &[],
            experience: &[],
            job_title: "Analyst",
            company: "Initech",
            job_description: "Reports in Excel",
            tone: DEFAULT_TONE,
        }
    }

    #[tokio::test]
    async fn test_template_used_without_llm() {
        let drafted = draft_letter(None, &TemplateWriter, &letter_request())
            .await
            .unwrap();
        assert_eq!(drafted.mode, "template");
        assert!(drafted.note.is_none());
        assert!(drafted.text.contains("Analyst position at Initech"));
    }

    #[tokio::test]
    async fn test_llm_used_when_available() {
        let llm: &dyn CoverLetterWriter = &FixedWriter;
        let drafted = draft_letter(Some(llm), &TemplateWriter, &letter_request())
            .await
            .unwrap();
        assert_eq!(drafted.mode, "llm");
        assert_eq!(drafted.text, "Dear Hiring Manager, generated.");
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back_with_note() {
        let llm: &dyn CoverLetterWriter = &FailingWriter;
        let drafted = draft_letter(Some(llm), &TemplateWriter, &letter_request())
            .await
            .unwrap();
        assert_eq!(drafted.mode, "template");
        assert_eq!(
            drafted.note.as_deref(),
            Some("LLM generation failed: rate_limited")
        );
    }

    #[test]
    fn test_none_response_shape() {
        let none = CoverLetterResponse::none();
        assert_eq!(none.mode, "none");
        assert!(none.cover_letter.is_empty());
    }
}
