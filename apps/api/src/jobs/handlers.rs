//! Axum route handlers for job matching, match history and tracked jobs.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::cv::repository::get_cv_for_user;
use crate::cv::skills::extract_skills;
use crate::errors::AppError;
use crate::jobs::repository::{
    create_tracked_job, delete_tracked_job, list_matches_for_cv, list_tracked_jobs, save_match,
    update_tracked_job, MatchContext, NewTrackedJob,
};
use crate::jobs::status::JobStatus;
use crate::matching::{compute_match, MatchInput};
use crate::models::cv::CvRow;
use crate::models::job::{JobMatchRow, TrackedJobRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobMatchRequest {
    pub cv_id: Uuid,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub job_description: String,
    pub job_url: Option<String>,
    /// linkedin / indeed / glassdoor
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobMatchResponse {
    pub id: Uuid,
    pub match_id: Uuid,
    pub tracked_job_id: Option<Uuid>,
    pub cv_id: Uuid,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub job_description: String,
    pub job_url: Option<String>,
    pub source: Option<String>,
    pub match_score: f64,
    pub semantic_score: f64,
    pub skill_score: f64,
    pub job_skills: Vec<String>,
    pub overlapping_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl From<JobMatchRow> for JobMatchResponse {
    fn from(row: JobMatchRow) -> Self {
        Self {
            id: row.id,
            match_id: row.id,
            tracked_job_id: row.tracked_job_id,
            cv_id: row.cv_id,
            job_title: row.job_title,
            company: row.company,
            job_description: row.job_description,
            job_url: row.job_url,
            source: row.source,
            match_score: row.match_score,
            semantic_score: row.semantic_score,
            skill_score: row.skill_score,
            job_skills: row.job_skills,
            overlapping_skills: row.overlapping_skills,
            missing_skills: row.missing_skills,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TrackedJobsQuery {
    pub cv_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct JobCreate {
    pub cv_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub match_score: Option<f64>,
    #[serde(default)]
    pub status: JobStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub notes: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Request checks
// ────────────────────────────────────────────────────────────────────────────

/// Rejects a match request that cannot be scored and returns the CV to score.
///
/// Empty description → 400, missing or foreign CV → 404, CV without text → 400.
fn validate_match(request: &JobMatchRequest, cv: Option<CvRow>) -> Result<CvRow, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let cv = cv.ok_or_else(|| {
        AppError::NotFound("CV not found (or not owned by this user).".to_string())
    })?;

    if cv.parsed_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Stored CV does not contain parsed text.".to_string(),
        ));
    }
    Ok(cv)
}

/// A tracked job needs a title, a company and a CV owned by the caller.
fn validate_tracked_job(request: &JobCreate, cv: Option<&CvRow>) -> Result<(), AppError> {
    if request.job_title.trim().is_empty() || request.company.trim().is_empty() {
        return Err(AppError::Validation(
            "job_title and company are required".to_string(),
        ));
    }
    if cv.is_none() {
        return Err(AppError::NotFound(
            "CV not found (or not owned by this user).".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /jobs/match
///
/// Scores the caller's CV against a job description, records the match in history
/// and keeps the tracked job for this posting up to date.
pub async fn handle_match_job(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<JobMatchRequest>,
) -> Result<Json<JobMatchResponse>, AppError> {
    let cv = get_cv_for_user(&state.db, request.cv_id, &user.user_id).await?;
    let cv = validate_match(&request, cv)?;

    let job_skills = extract_skills(&request.job_description);

    let result = compute_match(&MatchInput {
        cv_text: cv.parsed_text,
        cv_skills: cv.skills,
        job_text: request.job_description.clone(),
        job_skills,
    });

    info!(
        "Match for cv {}: score={} semantic={} skill={} missing={:?}",
        request.cv_id,
        result.match_score,
        result.semantic_score,
        result.skill_score,
        result.missing_skills
    );

    let row = save_match(
        &state.db,
        &MatchContext {
            user_id: &user.user_id,
            cv_id: request.cv_id,
            job_title: request.job_title.as_deref(),
            company: request.company.as_deref(),
            job_description: &request.job_description,
            job_url: request.job_url.as_deref(),
            source: request.source.as_deref(),
        },
        &result,
    )
    .await?;

    Ok(Json(row.into()))
}

/// GET /jobs/history/:cv_id
pub async fn handle_match_history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(cv_id): Path<Uuid>,
) -> Result<Json<Vec<JobMatchResponse>>, AppError> {
    let rows = list_matches_for_cv(&state.db, &user.user_id, cv_id).await?;
    Ok(Json(rows.into_iter().map(JobMatchResponse::from).collect()))
}

/// GET /jobs?cv_id=
pub async fn handle_list_tracked_jobs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<TrackedJobsQuery>,
) -> Result<Json<Vec<TrackedJobRow>>, AppError> {
    let jobs = list_tracked_jobs(&state.db, &user.user_id, params.cv_id).await?;
    Ok(Json(jobs))
}

/// POST /jobs
///
/// Posting the same title and company for a CV again updates the existing entry.
pub async fn handle_create_tracked_job(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<JobCreate>,
) -> Result<Json<TrackedJobRow>, AppError> {
    let cv = get_cv_for_user(&state.db, request.cv_id, &user.user_id).await?;
    validate_tracked_job(&request, cv.as_ref())?;

    let row = create_tracked_job(
        &state.db,
        &user.user_id,
        NewTrackedJob {
            cv_id: request.cv_id,
            job_title: &request.job_title,
            company: &request.company,
            match_score: request.match_score,
            status: request.status,
            notes: request.notes.as_deref(),
        },
    )
    .await?;
    Ok(Json(row))
}

/// PATCH /jobs/:id
pub async fn handle_update_tracked_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<Uuid>,
    Json(request): Json<JobUpdate>,
) -> Result<StatusCode, AppError> {
    let updated = update_tracked_job(
        &state.db,
        &user.user_id,
        job_id,
        request.status,
        request.notes.as_deref(),
    )
    .await?;

    if !updated {
        return Err(AppError::NotFound("Tracked job not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /jobs/:id
pub async fn handle_delete_tracked_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !delete_tracked_job(&state.db, &user.user_id, job_id).await? {
        return Err(AppError::NotFound("Tracked job not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_cv(parsed_text: &str) -> CvRow {
        CvRow {
            id: Uuid::new_v4(),
            user_id: "user_1".to_string(),
            file_name: "cv.pdf".to_string(),
            parsed_text: parsed_text.to_string(),
            skills: vec!["Python".to_string()],
            experience: vec![],
            s3_key: None,
            created_at: Utc::now(),
        }
    }

    fn make_match_request(job_description: &str) -> JobMatchRequest {
        JobMatchRequest {
            cv_id: Uuid::new_v4(),
            job_title: None,
            company: None,
            job_description: job_description.to_string(),
            job_url: None,
            source: None,
        }
    }

    fn make_job_create(job_title: &str, company: &str) -> JobCreate {
        JobCreate {
            cv_id: Uuid::new_v4(),
            job_title: job_title.to_string(),
            company: company.to_string(),
            match_score: None,
            status: JobStatus::Saved,
            notes: None,
        }
    }

    #[test]
    fn test_validate_match_rejects_blank_description() {
        let err = validate_match(&make_match_request("   \n"), Some(make_cv("Python developer")))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_match_missing_cv_is_not_found() {
        let err = validate_match(&make_match_request("Python developer"), None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_validate_match_rejects_cv_without_text() {
        let err = validate_match(&make_match_request("Python developer"), Some(make_cv("  ")))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_match_returns_cv() {
        let cv = validate_match(
            &make_match_request("Python developer"),
            Some(make_cv("Python developer with SQL")),
        )
        .unwrap();
        assert_eq!(cv.parsed_text, "Python developer with SQL");
    }

    #[test]
    fn test_validate_tracked_job_unknown_cv_is_not_found() {
        let err = validate_tracked_job(&make_job_create("Analyst", "Initech"), None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_validate_tracked_job_requires_title_and_company() {
        let cv = make_cv("text");
        let err = validate_tracked_job(&make_job_create("", "Initech"), Some(&cv)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = validate_tracked_job(&make_job_create("Analyst", " "), Some(&cv)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_tracked_job_accepts_owned_cv() {
        let cv = make_cv("text");
        assert!(validate_tracked_job(&make_job_create("Analyst", "Initech"), Some(&cv)).is_ok());
    }

    #[test]
    fn test_match_request_optional_fields() {
        let json = r#"{
            "cv_id": "6f1c1a0e-6a4e-4f7b-9b43-0a4c3c2f9d11",
            "job_description": "Python developer"
        }"#;
        let req: JobMatchRequest = serde_json::from_str(json).unwrap();
        assert!(req.job_title.is_none());
        assert!(req.source.is_none());
        assert_eq!(req.job_description, "Python developer");
    }

    #[test]
    fn test_job_create_status_defaults_to_saved() {
        let json = r#"{
            "cv_id": "6f1c1a0e-6a4e-4f7b-9b43-0a4c3c2f9d11",
            "job_title": "Support Engineer",
            "company": "Acme"
        }"#;
        let req: JobCreate = serde_json::from_str(json).unwrap();
        assert_eq!(req.status, JobStatus::Saved);
    }

    #[test]
    fn test_response_echoes_history_row() {
        let id = Uuid::new_v4();
        let tracked = Uuid::new_v4();
        let row = JobMatchRow {
            id,
            user_id: "user_1".to_string(),
            cv_id: Uuid::new_v4(),
            job_title: Some("Data Analyst".to_string()),
            company: None,
            job_description: "SQL and Excel".to_string(),
            job_url: None,
            source: Some("indeed".to_string()),
            match_score: 61.3,
            semantic_score: 0.58,
            skill_score: 0.5,
            job_skills: vec!["excel".to_string(), "sql".to_string()],
            overlapping_skills: vec!["sql".to_string()],
            missing_skills: vec!["excel".to_string()],
            tracked_job_id: Some(tracked),
            created_at: Utc::now(),
        };

        let response = JobMatchResponse::from(row);
        assert_eq!(response.id, id);
        assert_eq!(response.match_id, id);
        assert_eq!(response.tracked_job_id, Some(tracked));
        assert_eq!(response.missing_skills, vec!["excel"]);
    }
}
