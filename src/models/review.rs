use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::directory::Rated;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub reviewer_id: Uuid,
    /// 1-5 stars
    pub rating: i32,
    #[serde(default)]
    pub body: String,
    /// Music vibe, 1-10
    pub music_score: Option<i32>,
    /// Difficulty, 1-10
    pub difficulty_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rated for Review {
    fn rating(&self) -> i32 {
        self.rating
    }
}

/// Validated review ready for upsert, keyed by (instructor, reviewer)
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub instructor_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i32,
    pub body: String,
    pub music_score: Option<i32>,
    pub difficulty_score: Option<i32>,
}
