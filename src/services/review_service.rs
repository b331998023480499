use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::forms::ReviewForm;
use crate::models::Review;
use crate::session::Session;
use crate::store::{DirectoryStore, ReviewQuery};

pub struct ReviewService {
    store: Arc<dyn DirectoryStore>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// The caller's existing review of an instructor, used to prefill the form
    pub async fn own_review(&self, session: &Session, instructor_id: Uuid) -> Result<Option<Review>, ApiError> {
        let query = ReviewQuery::for_instructor(instructor_id).by_reviewer(session.user_id).limit(1);
        Ok(self.store.find_reviews(&query).await?.into_iter().next())
    }

    /// Creates or replaces the caller's review of an instructor
    pub async fn submit(&self, session: &Session, instructor_id: Uuid, form: ReviewForm) -> Result<Review, ApiError> {
        if instructor_id == session.user_id {
            return Err(ApiError::forbidden("You cannot review your own profile"));
        }
        if self.store.get_instructor(instructor_id).await?.is_none() {
            return Err(ApiError::not_found(format!("Instructor {} not found", instructor_id)));
        }

        let draft = form.validate(instructor_id, session.user_id)?;
        let review = self.store.upsert_review(&draft).await?;
        info!("Review {} saved for instructor {}", review.id, instructor_id);
        Ok(review)
    }
}
