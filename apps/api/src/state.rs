use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::auth::JwksVerifier;
use crate::config::Config;
use crate::cover_letter::writer::CoverLetterWriter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    pub verifier: Arc<JwksVerifier>,
    /// LLM-backed writer, present only when an API key is configured.
    pub llm_writer: Option<Arc<dyn CoverLetterWriter>>,
    pub template_writer: Arc<dyn CoverLetterWriter>,
}
