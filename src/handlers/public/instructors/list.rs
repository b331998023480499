use axum::extract::State;
use serde::Deserialize;

use crate::app::AppState;
use crate::directory::{DirectoryFilter, ListState};
use crate::error::ApiError;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult};
use crate::services::DirectoryPage;

/// Query string of the directory page
#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    /// Comma separated, any match
    pub category: Option<String>,
    pub min_rating: Option<f64>,
    pub search: Option<String>,
    pub location: Option<String>,
}

impl DirectoryQuery {
    pub fn into_filter(self) -> Result<DirectoryFilter, ApiError> {
        let mut filter = DirectoryFilter::new();

        for category in self.category.iter().flat_map(|c| c.split(',')) {
            let category = category.trim();
            if !category.is_empty() {
                filter = filter.category(category);
            }
        }

        if let Some(min) = self.min_rating {
            if !(0.0..=5.0).contains(&min) {
                return Err(ApiError::bad_request("min_rating must be between 0 and 5"));
            }
            filter = filter.min_rating(min);
        }

        if let Some(search) = self.search {
            filter = filter.search(search);
        }

        if let Some(location) = self.location.filter(|l| !l.trim().is_empty()) {
            filter = filter.location(location.trim());
        }

        Ok(filter)
    }
}

/// GET /instructors - filtered directory
///
/// `data.state` is `populated` or `empty`; a store failure is a 503 rather
/// than an empty list.
pub async fn instructors_get(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DirectoryQuery>,
) -> ApiResult<DirectoryPage> {
    let filter = query.into_filter()?;
    let page = state.directory.directory(filter).await;

    if let ListState::Error(reason) = &page.state {
        return Err(ApiError::service_unavailable(format!("Could not load instructors: {}", reason)));
    }
    Ok(ApiResponse::success(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_categories_and_trims_location() {
        let query = DirectoryQuery {
            category: Some("Yoga, HIIT,,".into()),
            location: Some(" Austin, TX ".into()),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.categories.len(), 2);
        assert!(filter.categories.contains("HIIT"));
        assert_eq!(filter.location.as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn rejects_out_of_range_min_rating() {
        let query = DirectoryQuery { min_rating: Some(7.5), ..Default::default() };
        assert_eq!(query.into_filter().unwrap_err().status_code(), 400);
    }

    #[test]
    fn blank_location_is_no_constraint() {
        let query = DirectoryQuery { location: Some("  ".into()), ..Default::default() };
        assert!(query.into_filter().unwrap().is_unconstrained());
    }
}
