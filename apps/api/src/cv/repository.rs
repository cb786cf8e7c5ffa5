use std::future::Future;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::cv::CvRow;

/// Fields of a freshly parsed CV, ready to insert.
pub struct NewCv<'a> {
    pub id: Uuid,
    pub user_id: &'a str,
    pub file_name: &'a str,
    pub parsed_text: &'a str,
    pub skills: &'a [String],
    pub experience: &'a [String],
    pub s3_key: Option<&'a str>,
}

pub fn pdf_object_key(user_id: &str, cv_id: Uuid) -> String {
    format!("cvs/{user_id}/{cv_id}.pdf")
}

/// Object storage for original CV PDFs.
#[async_trait]
pub trait PdfArchive: Send + Sync {
    async fn put(&self, key: &str, file_bytes: Bytes) -> Result<(), AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

pub struct S3PdfArchive<'a> {
    pub client: &'a aws_sdk_s3::Client,
    pub bucket: &'a str,
}

#[async_trait]
impl PdfArchive for S3PdfArchive<'_> {
    async fn put(&self, key: &str, file_bytes: Bytes) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(self.bucket)
            .key(key)
            .content_type("application/pdf")
            .body(ByteStream::from(file_bytes))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload {key}: {e}")))?;

        info!("Archived CV PDF to s3://{}/{key}", self.bucket);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete {key}: {e}")))?;

        info!("Removed CV PDF s3://{}/{key}", self.bucket);
        Ok(())
    }
}

/// Archives the PDF, then runs `insert`. If the insert fails the archived object
/// is deleted again so no file is left without a CV row.
pub async fn archive_and_insert<A, F>(
    archive: &A,
    key: &str,
    file_bytes: Bytes,
    insert: F,
) -> Result<CvRow, AppError>
where
    A: PdfArchive + ?Sized,
    F: Future<Output = Result<CvRow, AppError>>,
{
    archive.put(key, file_bytes).await?;

    match insert.await {
        Ok(row) => Ok(row),
        Err(e) => {
            if let Err(cleanup) = archive.delete(key).await {
                warn!("Could not remove orphaned PDF {key}: {cleanup}");
            }
            Err(e)
        }
    }
}

pub async fn insert_cv(pool: &PgPool, cv: NewCv<'_>) -> Result<CvRow, AppError> {
    let row = sqlx::query_as::<_, CvRow>(
        r#"
        INSERT INTO cvs (id, user_id, file_name, parsed_text, skills, experience, s3_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(cv.id)
    .bind(cv.user_id)
    .bind(cv.file_name)
    .bind(cv.parsed_text)
    .bind(cv.skills)
    .bind(cv.experience)
    .bind(cv.s3_key)
    .fetch_one(pool)
    .await?;

    info!("Inserted CV {} for user {}", row.id, row.user_id);
    Ok(row)
}

/// Returns the CV only if it belongs to `user_id`.
pub async fn get_cv_for_user(
    pool: &PgPool,
    cv_id: Uuid,
    user_id: &str,
) -> Result<Option<CvRow>, AppError> {
    let row = sqlx::query_as::<_, CvRow>("SELECT * FROM cvs WHERE id = $1 AND user_id = $2")
        .bind(cv_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
