use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::forms::ProfileForm;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::ProfileSaved;
use crate::session::Session;

/// PUT /api/instructor/profile - validate and merge a profile edit
///
/// Blank fields keep the stored value. Validation failures come back as 400
/// with `field_errors` keyed like `favorite_products[1].purchase_url`, and
/// nothing is written.
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ApiJson(form): ApiJson<ProfileForm>,
) -> ApiResult<ProfileSaved> {
    Ok(ApiResponse::success(state.profiles.save(&session, form).await?))
}
