use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, DirectoryStore, ReviewOrder, ReviewQuery, StoreError};
use crate::models::{Account, InstructorProfile, Review, ReviewDraft, Role};

/// Process-local record store used in development and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
    instructors: RwLock<HashMap<Uuid, InstructorProfile>>,
    reviews: RwLock<Vec<Review>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == email) {
            return Err(StoreError::Conflict(format!("account {} already exists", email)));
        }
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role: Role::User,
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.values().find(|a| a.email == email).cloned())
    }

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn elevate_to_instructor(&self, id: Uuid) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("account {}", id)))?;
        account.role = Role::Instructor;
        Ok(account.clone())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
        Ok(accounts)
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn list_instructors(&self) -> Result<Vec<InstructorProfile>, StoreError> {
        let mut profiles: Vec<InstructorProfile> = self.instructors.read().await.values().cloned().collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(profiles)
    }

    async fn get_instructor(&self, id: Uuid) -> Result<Option<InstructorProfile>, StoreError> {
        Ok(self.instructors.read().await.get(&id).cloned())
    }

    async fn ensure_instructor(&self, id: Uuid) -> Result<InstructorProfile, StoreError> {
        if !self.accounts.read().await.contains_key(&id) {
            return Err(StoreError::NotFound(format!("account {}", id)));
        }
        let mut instructors = self.instructors.write().await;
        Ok(instructors.entry(id).or_insert_with(|| InstructorProfile::blank(id)).clone())
    }

    async fn upsert_instructor(&self, profile: &InstructorProfile) -> Result<InstructorProfile, StoreError> {
        if !self.accounts.read().await.contains_key(&profile.id) {
            return Err(StoreError::NotFound(format!("account {}", profile.id)));
        }
        let mut instructors = self.instructors.write().await;
        let mut stored = profile.clone();
        if let Some(existing) = instructors.get(&profile.id) {
            stored.created_at = existing.created_at;
        }
        instructors.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_reviews(&self, query: &ReviewQuery) -> Result<Vec<Review>, StoreError> {
        let mut reviews: Vec<Review> = self
            .reviews
            .read()
            .await
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();

        match query.order {
            ReviewOrder::NewestFirst => reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id))),
            ReviewOrder::OldestFirst => reviews.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))),
            ReviewOrder::HighestRated => {
                reviews.sort_by(|a, b| b.rating.cmp(&a.rating).then(b.created_at.cmp(&a.created_at)))
            }
            ReviewOrder::LowestRated => {
                reviews.sort_by(|a, b| a.rating.cmp(&b.rating).then(b.created_at.cmp(&a.created_at)))
            }
        }
        if let Some(limit) = query.limit {
            reviews.truncate(limit);
        }
        Ok(reviews)
    }

    async fn all_ratings(&self) -> Result<Vec<(Uuid, i32)>, StoreError> {
        Ok(self.reviews.read().await.iter().map(|r| (r.instructor_id, r.rating)).collect())
    }

    async fn upsert_review(&self, draft: &ReviewDraft) -> Result<Review, StoreError> {
        if !self.instructors.read().await.contains_key(&draft.instructor_id) {
            return Err(StoreError::NotFound(format!("instructor {}", draft.instructor_id)));
        }

        let now = Utc::now();
        let mut reviews = self.reviews.write().await;
        if let Some(existing) = reviews
            .iter_mut()
            .find(|r| r.instructor_id == draft.instructor_id && r.reviewer_id == draft.reviewer_id)
        {
            existing.rating = draft.rating;
            existing.body = draft.body.clone();
            existing.music_score = draft.music_score;
            existing.difficulty_score = draft.difficulty_score;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let review = Review {
            id: Uuid::new_v4(),
            instructor_id: draft.instructor_id,
            reviewer_id: draft.reviewer_id,
            rating: draft.rating,
            body: draft.body.clone(),
            music_score: draft.music_score,
            difficulty_score: draft.difficulty_score,
            created_at: now,
            updated_at: now,
        };
        reviews.push(review.clone());
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn instructor(store: &MemoryStore, email: &str) -> Uuid {
        let account = store.create_account(email, "hash").await.unwrap();
        store.elevate_to_instructor(account.id).await.unwrap();
        store.ensure_instructor(account.id).await.unwrap();
        account.id
    }

    fn draft(instructor_id: Uuid, reviewer_id: Uuid, rating: i32) -> ReviewDraft {
        ReviewDraft {
            instructor_id,
            reviewer_id,
            rating,
            body: String::new(),
            music_score: None,
            difficulty_score: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_account("a@example.com", "h").await.unwrap();
        assert!(matches!(
            store.create_account("a@example.com", "h").await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn elevation_is_idempotent() {
        let store = MemoryStore::new();
        let id = instructor(&store, "i@example.com").await;
        let again = store.elevate_to_instructor(id).await.unwrap();
        assert_eq!(again.role, Role::Instructor);

        let mut profile = store.get_instructor(id).await.unwrap().unwrap();
        profile.name = Some("Maya".into());
        store.upsert_instructor(&profile).await.unwrap();
        let ensured = store.ensure_instructor(id).await.unwrap();
        assert_eq!(ensured.name.as_deref(), Some("Maya"));
    }

    #[tokio::test]
    async fn review_upsert_keeps_one_per_pair() {
        let store = MemoryStore::new();
        let instructor_id = instructor(&store, "i@example.com").await;
        let reviewer = store.create_account("r@example.com", "h").await.unwrap().id;

        let first = store.upsert_review(&draft(instructor_id, reviewer, 3)).await.unwrap();
        let second = store.upsert_review(&draft(instructor_id, reviewer, 5)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.all_ratings().await.unwrap(), vec![(instructor_id, 5)]);
    }

    #[tokio::test]
    async fn review_for_unknown_instructor_is_not_found() {
        let store = MemoryStore::new();
        let reviewer = store.create_account("r@example.com", "h").await.unwrap().id;
        assert!(matches!(
            store.upsert_review(&draft(Uuid::new_v4(), reviewer, 4)).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn find_reviews_applies_pushdown() {
        let store = MemoryStore::new();
        let a = instructor(&store, "a@example.com").await;
        let b = instructor(&store, "b@example.com").await;
        let r1 = store.create_account("r1@example.com", "h").await.unwrap().id;
        let r2 = store.create_account("r2@example.com", "h").await.unwrap().id;

        store.upsert_review(&draft(a, r1, 2)).await.unwrap();
        store.upsert_review(&draft(a, r2, 5)).await.unwrap();
        store.upsert_review(&draft(b, r1, 4)).await.unwrap();

        let for_a = store
            .find_reviews(&ReviewQuery::for_instructor(a).order(ReviewOrder::HighestRated))
            .await
            .unwrap();
        assert_eq!(for_a.iter().map(|r| r.rating).collect::<Vec<_>>(), vec![5, 2]);

        let own = store.find_reviews(&ReviewQuery::for_instructor(a).by_reviewer(r1)).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].rating, 2);

        let limited = store.find_reviews(&ReviewQuery::default().limit(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
    }
}
