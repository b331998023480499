//! Boundaries to the account service, record store and blob storage.
//!
//! Handlers and services only see the traits below; `postgres` and `memory`
//! provide the two record-store backends and `blob` the filesystem image store.

pub mod blob;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::database::DatabaseError;
use crate::models::{Account, InstructorProfile, Review, ReviewDraft};

pub use blob::{image_extension, FsBlobStore, HEADSHOT_DIR};
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Blob storage error: {0}")]
    Blob(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(DatabaseError::Sqlx(err))
    }
}

/// Review ordering; `newest`, `oldest`, `highest` or `lowest` on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ReviewOrder {
    #[default]
    #[serde(rename = "newest")]
    NewestFirst,
    #[serde(rename = "oldest")]
    OldestFirst,
    #[serde(rename = "highest")]
    HighestRated,
    #[serde(rename = "lowest")]
    LowestRated,
}

impl FromStr for ReviewOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(ReviewOrder::NewestFirst),
            "oldest" => Ok(ReviewOrder::OldestFirst),
            "highest" => Ok(ReviewOrder::HighestRated),
            "lowest" => Ok(ReviewOrder::LowestRated),
            other => Err(format!("unknown review order '{}' (newest, oldest, highest, lowest)", other)),
        }
    }
}

impl ReviewOrder {
    pub fn as_order_str(&self) -> &'static str {
        match self {
            ReviewOrder::NewestFirst => "created_at desc, id asc",
            ReviewOrder::OldestFirst => "created_at asc, id asc",
            ReviewOrder::HighestRated => "rating desc, created_at desc",
            ReviewOrder::LowestRated => "rating asc, created_at desc",
        }
    }
}

/// Equality filters, ordering and limit pushed down to the record store
#[derive(Debug, Clone, Default)]
pub struct ReviewQuery {
    pub instructor_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
    pub order: ReviewOrder,
    pub limit: Option<usize>,
}

impl ReviewQuery {
    pub fn for_instructor(instructor_id: Uuid) -> Self {
        Self { instructor_id: Some(instructor_id), ..Default::default() }
    }

    pub fn by_reviewer(mut self, reviewer_id: Uuid) -> Self {
        self.reviewer_id = Some(reviewer_id);
        self
    }

    pub fn order(mut self, order: ReviewOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, review: &Review) -> bool {
        self.instructor_id.map_or(true, |id| review.instructor_id == id)
            && self.reviewer_id.map_or(true, |id| review.reviewer_id == id)
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered
    async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account, StoreError>;

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Idempotent: elevating an instructor returns it unchanged
    async fn elevate_to_instructor(&self, id: Uuid) -> Result<Account, StoreError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;
}

#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Newest profiles first
    async fn list_instructors(&self) -> Result<Vec<InstructorProfile>, StoreError>;

    async fn get_instructor(&self, id: Uuid) -> Result<Option<InstructorProfile>, StoreError>;

    /// Creates an empty profile row if none exists
    async fn ensure_instructor(&self, id: Uuid) -> Result<InstructorProfile, StoreError>;

    async fn upsert_instructor(&self, profile: &InstructorProfile) -> Result<InstructorProfile, StoreError>;

    async fn find_reviews(&self, query: &ReviewQuery) -> Result<Vec<Review>, StoreError>;

    /// `(instructor_id, rating)` for every review
    async fn all_ratings(&self) -> Result<Vec<(Uuid, i32)>, StoreError>;

    /// One review per (instructor, reviewer); a second submission replaces the first
    async fn upsert_review(&self, draft: &ReviewDraft) -> Result<Review, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores the image under the owner's key and returns its public URL
    async fn put_image(&self, owner: Uuid, content_type: &str, bytes: &[u8]) -> Result<String, StoreError>;

    /// Removes the owner's images in every format other than `keep_content_type`.
    /// Call only once the new image URL is persisted.
    async fn prune_images(&self, owner: Uuid, keep_content_type: &str) -> Result<(), StoreError>;
}
