use axum::extract::State;

use crate::app::AppState;
use crate::directory::ListState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::InstructorListing;

/// GET /instructors/top - home page list of the highest rated instructors
pub async fn top_get(State(state): State<AppState>) -> ApiResult<ListState<InstructorListing>> {
    match state.directory.top().await {
        ListState::Error(reason) => Err(ApiError::service_unavailable(format!(
            "Could not load instructors: {}",
            reason
        ))),
        list => Ok(ApiResponse::success(list)),
    }
}
