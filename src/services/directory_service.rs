use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::directory::{
    location_keys, summarize_by_instructor, top_rated, DirectoryFilter, FetchOutcome, ListState, RatingSummary,
};
use crate::error::ApiError;
use crate::models::{InstructorListing, Review};
use crate::store::{DirectoryStore, ReviewOrder, ReviewQuery, StoreError};

/// Instructor profiles joined with their rating aggregates
#[derive(Debug, Clone)]
pub struct Listings {
    pub items: Vec<InstructorListing>,
    /// Ratings could not be fetched; every listing is shown unrated
    pub ratings_degraded: bool,
}

#[derive(Debug, Serialize)]
pub struct DirectoryPage {
    #[serde(flatten)]
    pub state: ListState<InstructorListing>,
    pub total: usize,
    pub filter: DirectoryFilter,
    pub ratings_degraded: bool,
}

#[derive(Debug, Serialize)]
pub struct InstructorDetail {
    #[serde(flatten)]
    pub listing: InstructorListing,
    pub reviews: Vec<Review>,
}

pub struct DirectoryService {
    store: Arc<dyn DirectoryStore>,
    top_n: usize,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn DirectoryStore>, top_n: usize) -> Self {
        Self { store, top_n }
    }

    /// Profiles and ratings are fetched concurrently and joined in memory
    pub async fn fetch_listings(&self) -> Result<Listings, StoreError> {
        let (profiles, ratings) = tokio::join!(self.store.list_instructors(), self.store.all_ratings());
        let profiles = profiles?;

        let (summaries, ratings_degraded) = match ratings {
            Ok(ratings) => (summarize_by_instructor(&ratings), false),
            Err(e) => {
                warn!("Ratings unavailable, listing instructors unrated: {}", e);
                (Default::default(), true)
            }
        };

        let items = profiles
            .into_iter()
            .map(|profile| {
                let summary = summaries.get(&profile.id).copied().unwrap_or_default();
                InstructorListing::new(profile, summary)
            })
            .collect();

        Ok(Listings { items, ratings_degraded })
    }

    pub async fn directory(&self, filter: DirectoryFilter) -> DirectoryPage {
        let state = ListState::default().start();
        let fetched = self.fetch_listings().await;

        let (outcome, total, ratings_degraded) = match fetched {
            Ok(listings) => {
                let total = listings.items.len();
                let matched = filter.apply_owned(listings.items);
                debug!("Directory filter matched {} of {} instructors", matched.len(), total);
                (FetchOutcome::Fetched(matched), total, listings.ratings_degraded)
            }
            Err(e) => {
                error!("Directory fetch failed: {}", e);
                (FetchOutcome::Failed(e.to_string()), 0, false)
            }
        };

        DirectoryPage {
            state: state.resolve(outcome),
            total,
            filter,
            ratings_degraded,
        }
    }

    /// Home page list: highest rated first, ties keep fetch order
    pub async fn top(&self) -> ListState<InstructorListing> {
        let outcome: FetchOutcome<InstructorListing> = self
            .fetch_listings()
            .await
            .map(|listings| top_rated(&listings.items, self.top_n))
            .into();
        ListState::default().start().resolve(outcome)
    }

    pub async fn locations(&self) -> Result<Vec<String>, ApiError> {
        let listings = self.fetch_listings().await?;
        Ok(location_keys(&listings.items))
    }

    /// Profile with its reviews in the requested order
    pub async fn instructor_detail(&self, id: Uuid, order: ReviewOrder) -> Result<InstructorDetail, ApiError> {
        let query = ReviewQuery::for_instructor(id).order(order);
        let (profile, reviews) = tokio::join!(self.store.get_instructor(id), self.store.find_reviews(&query));

        let profile = profile?.ok_or_else(|| ApiError::not_found(format!("Instructor {} not found", id)))?;
        let reviews = reviews?;
        let summary = RatingSummary::from_ratings(reviews.iter().map(|r| r.rating));

        Ok(InstructorDetail {
            listing: InstructorListing::new(profile, summary),
            reviews,
        })
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.health_check().await
    }
}
