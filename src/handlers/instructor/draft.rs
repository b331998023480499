use axum::{extract::State, Extension};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::forms::{Draft, ProfileForm};
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::session::Session;

/// GET /api/instructor/draft - unsaved edits, 404 when there are none
pub async fn draft_get(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Draft> {
    Ok(ApiResponse::success(state.profiles.draft(&session).await?))
}

/// PUT /api/instructor/draft - stash the form as-is; no validation
pub async fn draft_put(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ApiJson(form): ApiJson<ProfileForm>,
) -> ApiResult<Draft> {
    Ok(ApiResponse::success(state.profiles.save_draft(&session, form).await?))
}

/// DELETE /api/instructor/draft
pub async fn draft_delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Value> {
    let discarded = state.profiles.discard_draft(&session).await?;
    Ok(ApiResponse::success(json!({ "discarded": discarded })))
}
