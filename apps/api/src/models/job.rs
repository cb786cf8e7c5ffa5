use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row of match history. Written once per `/jobs/match` call.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobMatchRow {
    pub id: Uuid,
    pub user_id: String,
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
    pub tracked_job_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A job the user is following through the application pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrackedJobRow {
    pub id: Uuid,
    pub user_id: String,
    pub cv_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub job_description: Option<String>,
    pub job_url: Option<String>,
    pub source: Option<String>,
    pub match_score: Option<f64>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
