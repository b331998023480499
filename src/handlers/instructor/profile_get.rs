use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::InstructorProfile;
use crate::session::Session;

/// GET /api/instructor/profile - the caller's own profile for editing
pub async fn profile_get(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<InstructorProfile> {
    Ok(ApiResponse::success(state.profiles.profile(&session).await?))
}
