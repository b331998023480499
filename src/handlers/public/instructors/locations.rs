use axum::extract::State;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /instructors/locations - distinct "city, state" keys for the picker
pub async fn locations_get(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(ApiResponse::success(state.directory.locations().await?))
}
