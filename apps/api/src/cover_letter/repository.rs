use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::cover_letter::CoverLetterRow;

pub struct NewCoverLetter<'a> {
    pub user_id: &'a str,
    pub cv_id: Uuid,
    pub job_id: Uuid,
    pub job_title: &'a str,
    pub company: &'a str,
    pub tone: &'a str,
    pub text: &'a str,
    pub mode: &'a str,
    pub note: Option<&'a str>,
}

pub async fn save_cover_letter(
    pool: &PgPool,
    letter: NewCoverLetter<'_>,
) -> Result<CoverLetterRow, AppError> {
    let row = sqlx::query_as::<_, CoverLetterRow>(
        r#"
        INSERT INTO cover_letters
            (id, user_id, cv_id, job_id, job_title, company, tone, text, mode, note)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(letter.user_id)
    .bind(letter.cv_id)
    .bind(letter.job_id)
    .bind(letter.job_title)
    .bind(letter.company)
    .bind(letter.tone)
    .bind(letter.text)
    .bind(letter.mode)
    .bind(letter.note)
    .fetch_one(pool)
    .await?;

    info!(
        "Saved {} cover letter {} for job {}",
        row.mode, row.id, row.job_id
    );
    Ok(row)
}

pub async fn get_latest_cover_letter(
    pool: &PgPool,
    user_id: &str,
    job_id: Uuid,
) -> Result<Option<CoverLetterRow>, AppError> {
    let row = sqlx::query_as::<_, CoverLetterRow>(
        r#"
        SELECT * FROM cover_letters
        WHERE job_id = $1 AND user_id = $2
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(job_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
