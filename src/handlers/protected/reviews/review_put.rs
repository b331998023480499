use axum::{
    extract::{Path, State},
    Extension,
};

use crate::app::AppState;
use crate::forms::ReviewForm;
use crate::handlers::parse_id;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::models::Review;
use crate::session::Session;

/// PUT /api/reviews/:instructor_id - create or replace the caller's review
///
/// Input: `{"rating": 1-5, "body": "...", "music_score": 1-10?, "difficulty_score": 1-10?}`
pub async fn review_put(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(instructor_id): Path<String>,
    ApiJson(form): ApiJson<ReviewForm>,
) -> ApiResult<Review> {
    let instructor_id = parse_id(&instructor_id, "instructor")?;
    Ok(ApiResponse::success(state.reviews.submit(&session, instructor_id, form).await?))
}
