use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AuthPayload;
use crate::session::Session;

/// POST /api/auth/become-instructor - elevate the caller to instructor
///
/// Idempotent. Creates the empty profile row on first call and returns a
/// fresh token carrying the new role.
pub async fn become_instructor_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<AuthPayload> {
    Ok(ApiResponse::success(state.accounts.become_instructor(&session).await?))
}
