use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CoverLetterRow {
    pub id: Uuid,
    pub user_id: String,
    pub cv_id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub tone: String,
    pub text: String,
    /// "template" | "llm"
    pub mode: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
