use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvRow {
    pub id: Uuid,
    pub user_id: String,
    pub file_name: String,
    pub parsed_text: String,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    /// Object-storage key of the original PDF.
    pub s3_key: Option<String>,
    pub created_at: DateTime<Utc>,
}
