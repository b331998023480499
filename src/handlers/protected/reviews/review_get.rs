use axum::{
    extract::{Path, State},
    Extension,
};

use crate::app::AppState;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Review;
use crate::session::Session;

/// GET /api/reviews/:instructor_id - the caller's own review, or null
pub async fn review_get(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(instructor_id): Path<String>,
) -> ApiResult<Option<Review>> {
    let instructor_id = parse_id(&instructor_id, "instructor")?;
    Ok(ApiResponse::success(state.reviews.own_review(&session, instructor_id).await?))
}
