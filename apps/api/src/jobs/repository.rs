//! Match history and tracked jobs. Every query is scoped by `user_id`.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::status::JobStatus;
use crate::matching::MatchResult;
use crate::models::job::{JobMatchRow, TrackedJobRow};

pub const MATCH_HISTORY_LIMIT: i64 = 50;
pub const TRACKED_JOBS_LIMIT: i64 = 200;

/// Identifiers and posting details that accompany a `MatchResult` into storage.
pub struct MatchContext<'a> {
    pub user_id: &'a str,
    pub cv_id: Uuid,
    pub job_title: Option<&'a str>,
    pub company: Option<&'a str>,
    pub job_description: &'a str,
    pub job_url: Option<&'a str>,
    pub source: Option<&'a str>,
}

pub struct NewTrackedJob<'a> {
    pub cv_id: Uuid,
    pub job_title: &'a str,
    pub company: &'a str,
    pub match_score: Option<f64>,
    pub status: JobStatus,
    pub notes: Option<&'a str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Match history
// ────────────────────────────────────────────────────────────────────────────

/// Persists a match: upserts the tracked job for (user, CV, title, company) with the
/// latest score, then appends the history row pointing at it. One transaction.
pub async fn save_match(
    pool: &PgPool,
    ctx: &MatchContext<'_>,
    result: &MatchResult,
) -> Result<JobMatchRow, AppError> {
    let mut tx = pool.begin().await?;

    let tracked_job_id = upsert_tracked_job_from_match(&mut tx, ctx, result).await?;

    let row = sqlx::query_as::<_, JobMatchRow>(
        r#"
        INSERT INTO job_matches
            (id, user_id, cv_id, job_title, company, job_description, job_url, source,
             match_score, semantic_score, skill_score,
             job_skills, overlapping_skills, missing_skills, tracked_job_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(ctx.user_id)
    .bind(ctx.cv_id)
    .bind(ctx.job_title)
    .bind(ctx.company)
    .bind(ctx.job_description)
    .bind(ctx.job_url)
    .bind(ctx.source)
    .bind(result.match_score)
    .bind(result.semantic_score)
    .bind(result.skill_score)
    .bind(&result.job_skills)
    .bind(&result.overlapping_skills)
    .bind(&result.missing_skills)
    .bind(tracked_job_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Saved match {} (score {}) for user {} cv {}",
        row.id, row.match_score, ctx.user_id, ctx.cv_id
    );
    Ok(row)
}

/// Tracked jobs are keyed by (user, CV, title, company); a missing title or company
/// is stored as an empty string so the key stays comparable.
async fn upsert_tracked_job_from_match(
    tx: &mut Transaction<'_, Postgres>,
    ctx: &MatchContext<'_>,
    result: &MatchResult,
) -> Result<Uuid, AppError> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO tracked_jobs
            (id, user_id, cv_id, job_title, company, job_description, job_url, source,
             match_score, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (user_id, cv_id, job_title, company) DO UPDATE SET
            job_description = EXCLUDED.job_description,
            job_url = COALESCE(EXCLUDED.job_url, tracked_jobs.job_url),
            source = COALESCE(EXCLUDED.source, tracked_jobs.source),
            match_score = EXCLUDED.match_score,
            updated_at = now()
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(ctx.user_id)
    .bind(ctx.cv_id)
    .bind(ctx.job_title.unwrap_or_default())
    .bind(ctx.company.unwrap_or_default())
    .bind(ctx.job_description)
    .bind(ctx.job_url)
    .bind(ctx.source)
    .bind(result.match_score)
    .bind(JobStatus::default().as_str())
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

/// Most recent matches for one of the user's CVs, newest first.
pub async fn list_matches_for_cv(
    pool: &PgPool,
    user_id: &str,
    cv_id: Uuid,
) -> Result<Vec<JobMatchRow>, AppError> {
    let rows = sqlx::query_as::<_, JobMatchRow>(
        r#"
        SELECT * FROM job_matches
        WHERE user_id = $1 AND cv_id = $2
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(cv_id)
    .bind(MATCH_HISTORY_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ────────────────────────────────────────────────────────────────────────────
// Tracked jobs
// ────────────────────────────────────────────────────────────────────────────

pub async fn list_tracked_jobs(
    pool: &PgPool,
    user_id: &str,
    cv_id: Option<Uuid>,
) -> Result<Vec<TrackedJobRow>, AppError> {
    let rows = sqlx::query_as::<_, TrackedJobRow>(
        r#"
        SELECT * FROM tracked_jobs
        WHERE user_id = $1 AND ($2::uuid IS NULL OR cv_id = $2)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(cv_id)
    .bind(TRACKED_JOBS_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Inserts a tracked job, or refreshes the existing one for the same
/// `(user, cv, job_title, company)`.
pub async fn create_tracked_job(
    pool: &PgPool,
    user_id: &str,
    job: NewTrackedJob<'_>,
) -> Result<TrackedJobRow, AppError> {
    let row = sqlx::query_as::<_, TrackedJobRow>(
        r#"
        INSERT INTO tracked_jobs
            (id, user_id, cv_id, job_title, company, match_score, status, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id, cv_id, job_title, company) DO UPDATE SET
            match_score = COALESCE(EXCLUDED.match_score, tracked_jobs.match_score),
            status      = EXCLUDED.status,
            notes       = COALESCE(EXCLUDED.notes, tracked_jobs.notes),
            updated_at  = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(job.cv_id)
    .bind(job.job_title)
    .bind(job.company)
    .bind(job.match_score)
    .bind(job.status.as_str())
    .bind(job.notes)
    .fetch_one(pool)
    .await?;

    info!("Saved tracked job {} for user {user_id}", row.id);
    Ok(row)
}

/// Applies the provided fields; `None` leaves a column untouched.
/// Returns false if the job does not exist or belongs to someone else.
pub async fn update_tracked_job(
    pool: &PgPool,
    user_id: &str,
    job_id: Uuid,
    status: Option<JobStatus>,
    notes: Option<&str>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE tracked_jobs
        SET status = COALESCE($3, status),
            notes = COALESCE($4, notes),
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(job_id)
    .bind(user_id)
    .bind(status.map(JobStatus::as_str))
    .bind(notes)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_tracked_job(
    pool: &PgPool,
    user_id: &str,
    job_id: Uuid,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM tracked_jobs WHERE id = $1 AND user_id = $2")
        .bind(job_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Ownership check used before attaching cover letters to a job.
pub async fn tracked_job_exists(
    pool: &PgPool,
    user_id: &str,
    job_id: Uuid,
) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM tracked_jobs WHERE id = $1 AND user_id = $2)",
    )
    .bind(job_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}
