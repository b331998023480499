use axum::{body::Bytes, extract::State, http::HeaderMap, Extension};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ProfileSaved;
use crate::session::Session;

/// PUT /api/instructor/photo - raw image body with an `image/*` Content-Type
pub async fn photo_put(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<ProfileSaved> {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unsupported_media_type("Missing Content-Type header"))?;

    let saved = state.profiles.upload_photo(&session, content_type, &body).await?;
    Ok(ApiResponse::success(saved))
}
