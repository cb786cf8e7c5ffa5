//! Axum route handlers for CV upload and retrieval.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::cv::parser::parse_pdf;
use crate::cv::repository::{
    archive_and_insert, get_cv_for_user, insert_cv, pdf_object_key, NewCv, S3PdfArchive,
};
use crate::cv::skills::{extract_experience, extract_skills};
use crate::errors::AppError;
use crate::models::cv::CvRow;
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Serialize)]
pub struct UploadCvResponse {
    pub cv_id: Uuid,
    pub file_name: String,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
}

struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("cv.pdf").to_string();
        let content_type = field.content_type().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(AppError::Validation("Missing `file` field".to_string()))
}

/// POST /cvs/upload
///
/// Parses an uploaded PDF, scans it for skills and job-title lines, archives the
/// original and stores the parsed CV for the caller.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<UploadCvResponse>, AppError> {
    let upload = read_file_field(multipart).await?;

    if upload.content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
        return Err(AppError::Validation("Only PDF files are supported.".to_string()));
    }

    let parsed_text = parse_pdf(upload.bytes.clone())
        .await
        .map_err(|e| AppError::Pdf(format!("Error parsing PDF: {e}")))?;

    let skills = extract_skills(&parsed_text);
    let experience = extract_experience(&parsed_text);

    let cv_id = Uuid::new_v4();
    let s3_key = pdf_object_key(&user.user_id, cv_id);
    let archive = S3PdfArchive {
        client: &state.s3,
        bucket: &state.config.s3_bucket,
    };

    let row = archive_and_insert(
        &archive,
        &s3_key,
        upload.bytes,
        insert_cv(
            &state.db,
            NewCv {
                id: cv_id,
                user_id: &user.user_id,
                file_name: &upload.file_name,
                parsed_text: &parsed_text,
                skills: &skills,
                experience: &experience,
                s3_key: Some(&s3_key),
            },
        ),
    )
    .await?;

    info!(
        "Parsed CV {} ({} chars, {} skills) for user {}",
        row.id,
        parsed_text.len(),
        skills.len(),
        user.user_id
    );

    Ok(Json(UploadCvResponse {
        cv_id: row.id,
        file_name: row.file_name,
        skills: row.skills,
        experience: row.experience,
    }))
}

/// GET /cvs/:id
pub async fn handle_get_cv(
    State(state): State<AppState>,
    user: AuthUser,
    Path(cv_id): Path<Uuid>,
) -> Result<Json<CvRow>, AppError> {
    let cv = get_cv_for_user(&state.db, cv_id, &user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("CV {cv_id} not found")))?;
    Ok(Json(cv))
}
