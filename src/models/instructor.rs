use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directory::RatingSummary;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturedTrack {
    #[serde(default)]
    pub song_title: String,
    #[serde(default)]
    pub artist: String,
}

impl FeaturedTrack {
    pub fn is_blank(&self) -> bool {
        self.song_title.trim().is_empty() && self.artist.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecommendation {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub purchase_url: String,
}

impl ProductRecommendation {
    pub fn is_blank(&self) -> bool {
        self.product_name.trim().is_empty()
            && self.brand.trim().is_empty()
            && self.purchase_url.trim().is_empty()
    }
}

/// Public-facing profile of an instructor. `id` is the owning account id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub spotify_playlist_url: Option<String>,
    #[serde(default)]
    pub featured_tracks: Vec<FeaturedTrack>,
    #[serde(default)]
    pub favorite_products: Vec<ProductRecommendation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InstructorProfile {
    /// Empty profile created on role elevation
    pub fn blank(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: None,
            specialty: None,
            bio: None,
            image_url: None,
            categories: vec![],
            city: None,
            state: None,
            spotify_playlist_url: None,
            featured_tracks: vec![],
            favorite_products: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    /// "city, state" over the non-blank parts, or None when neither is set
    pub fn location_key(&self) -> Option<String> {
        let parts: Vec<&str> = [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Profile joined with its derived rating aggregate
#[derive(Debug, Clone, Serialize)]
pub struct InstructorListing {
    #[serde(flatten)]
    pub profile: InstructorProfile,
    pub average_rating: Option<f64>,
    pub review_count: usize,
    pub location: Option<String>,
}

impl InstructorListing {
    pub fn new(profile: InstructorProfile, summary: RatingSummary) -> Self {
        let location = profile.location_key();
        Self {
            profile,
            average_rating: summary.average,
            review_count: summary.count,
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_key_joins_city_and_state() {
        let mut profile = InstructorProfile::blank(Uuid::new_v4());
        assert_eq!(profile.location_key(), None);

        profile.city = Some("Austin".into());
        assert_eq!(profile.location_key().as_deref(), Some("Austin"));

        profile.state = Some("TX".into());
        assert_eq!(profile.location_key().as_deref(), Some("Austin, TX"));

        profile.city = Some("  ".into());
        assert_eq!(profile.location_key().as_deref(), Some("TX"));
    }

    #[test]
    fn blank_rows_detected() {
        assert!(FeaturedTrack::default().is_blank());
        assert!(!ProductRecommendation { brand: "Lulu".into(), ..Default::default() }.is_blank());
    }
}
