pub mod health;
pub mod me;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::cover_letter::handlers as cover_letter;
use crate::cv::handlers as cv;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/auth/me", get(me::me_handler))
        // CV intake
        .route(
            "/cvs/upload",
            post(cv::handle_upload_cv).layer(upload_limit),
        )
        .route("/cvs/:id", get(cv::handle_get_cv))
        // Matching + history
        .route("/jobs/match", post(jobs::handle_match_job))
        .route("/jobs/history/:cv_id", get(jobs::handle_match_history))
        // Tracked jobs
        .route(
            "/jobs",
            get(jobs::handle_list_tracked_jobs).post(jobs::handle_create_tracked_job),
        )
        .route(
            "/jobs/:id",
            patch(jobs::handle_update_tracked_job).delete(jobs::handle_delete_tracked_job),
        )
        // Cover letters
        .route(
            "/cover-letter/generate",
            post(cover_letter::handle_generate_cover_letter),
        )
        .route(
            "/cover-letter/latest/:job_id",
            get(cover_letter::handle_latest_cover_letter),
        )
        .with_state(state)
}
