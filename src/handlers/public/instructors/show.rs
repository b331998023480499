use axum::extract::{Path, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::handlers::parse_id;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult};
use crate::services::InstructorDetail;
use crate::store::ReviewOrder;

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    /// newest (default), oldest, highest or lowest
    #[serde(default)]
    pub sort: ReviewOrder,
}

/// GET /instructors/:id - profile with average rating and reviews, newest first
/// unless `?sort=` says otherwise
pub async fn instructor_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<DetailQuery>,
) -> ApiResult<InstructorDetail> {
    let id = parse_id(&id, "instructor")?;
    Ok(ApiResponse::success(state.directory.instructor_detail(id, query.sort).await?))
}
