use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FormError;
use crate::models::ReviewDraft;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub rating: i32,
    pub body: String,
    pub music_score: Option<i32>,
    pub difficulty_score: Option<i32>,
}

impl ReviewForm {
    pub fn validate(self, instructor_id: Uuid, reviewer_id: Uuid) -> Result<ReviewDraft, FormError> {
        let mut errors = FormError::new("Please fix the highlighted review fields");

        if self.rating == 0 {
            errors.push("rating", "Please select a rating");
        } else if !(1..=5).contains(&self.rating) {
            errors.push("rating", "Rating must be between 1 and 5");
        }
        for (field, score) in [("music_score", self.music_score), ("difficulty_score", self.difficulty_score)] {
            if matches!(score, Some(s) if !(1..=10).contains(&s)) {
                errors.push(field, "Score must be between 1 and 10");
            }
        }

        errors.into_result(ReviewDraft {
            instructor_id,
            reviewer_id,
            rating: self.rating,
            body: self.body.trim().to_string(),
            music_score: self.music_score,
            difficulty_score: self.difficulty_score,
        })
    }
}
