use axum::Json;
use serde_json::{json, Value};

use crate::auth::AuthUser;

/// GET /auth/me
/// Echoes the user id resolved from the bearer token.
pub async fn me_handler(user: AuthUser) -> Json<Value> {
    Json(json!({ "user_id": user.user_id }))
}
