use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::FormError;
use crate::config::DirectoryConfig;
use crate::models::{FeaturedTrack, InstructorProfile, ProductRecommendation};

/// Instructor profile edit as submitted. Every field may be blank; blank
/// values leave the stored profile untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub name: String,
    pub specialty: String,
    pub bio: String,
    pub categories: Vec<String>,
    pub city: String,
    pub state: String,
    pub spotify_playlist_url: String,
    pub featured_tracks: Vec<FeaturedTrack>,
    pub favorite_products: Vec<ProductRecommendation>,
}

#[derive(Debug, Clone)]
pub struct ProfileLimits {
    pub max_featured_tracks: usize,
    pub max_favorite_products: usize,
    /// Allowed category labels; empty allows anything
    pub categories: Vec<String>,
}

impl From<&DirectoryConfig> for ProfileLimits {
    fn from(config: &DirectoryConfig) -> Self {
        Self {
            max_featured_tracks: config.max_featured_tracks,
            max_favorite_products: config.max_favorite_products,
            categories: config.categories.clone(),
        }
    }
}

/// A profile form that passed validation, with blank rows removed and
/// every value trimmed
#[derive(Debug, Clone, PartialEq)]
pub struct ValidProfile(ProfileForm);

impl ProfileForm {
    pub fn validate(self, limits: &ProfileLimits) -> Result<ValidProfile, FormError> {
        let mut errors = FormError::new("Please fix the highlighted profile fields");

        let featured_tracks: Vec<FeaturedTrack> = self
            .featured_tracks
            .into_iter()
            .filter(|t| !t.is_blank())
            .map(|t| FeaturedTrack {
                song_title: t.song_title.trim().to_string(),
                artist: t.artist.trim().to_string(),
            })
            .collect();
        if featured_tracks.len() > limits.max_featured_tracks {
            errors.push(
                "featured_tracks",
                format!("At most {} featured tracks are allowed", limits.max_featured_tracks),
            );
        }
        for (i, track) in featured_tracks.iter().enumerate() {
            if track.song_title.is_empty() {
                errors.push(format!("featured_tracks[{}].song_title", i), "Song title is required");
            }
        }

        let favorite_products: Vec<ProductRecommendation> = self
            .favorite_products
            .into_iter()
            .filter(|p| !p.is_blank())
            .map(|p| ProductRecommendation {
                product_name: p.product_name.trim().to_string(),
                brand: p.brand.trim().to_string(),
                purchase_url: p.purchase_url.trim().to_string(),
            })
            .collect();
        if favorite_products.len() > limits.max_favorite_products {
            errors.push(
                "favorite_products",
                format!("At most {} favorite products are allowed", limits.max_favorite_products),
            );
        }
        for (i, product) in favorite_products.iter().enumerate() {
            let field = |name: &str| format!("favorite_products[{}].{}", i, name);
            if product.product_name.is_empty() {
                errors.push(field("product_name"), "Product name is required");
            }
            if product.brand.is_empty() {
                errors.push(field("brand"), "Brand is required");
            }
            if product.purchase_url.is_empty() {
                errors.push(field("purchase_url"), "Purchase link is required");
            } else if !is_web_url(&product.purchase_url) {
                errors.push(field("purchase_url"), "Purchase link must be a valid URL");
            }
        }

        let spotify_playlist_url = self.spotify_playlist_url.trim().to_string();
        if !spotify_playlist_url.is_empty() && !is_web_url(&spotify_playlist_url) {
            errors.push("spotify_playlist_url", "Playlist link must be a valid URL");
        }

        let mut categories: Vec<String> = Vec::new();
        for raw in self.categories.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
            let canonical = if limits.categories.is_empty() {
                Some(raw.to_string())
            } else {
                limits.categories.iter().find(|c| c.eq_ignore_ascii_case(raw)).cloned()
            };
            match canonical {
                Some(c) if !categories.contains(&c) => categories.push(c),
                Some(_) => {}
                None => errors.push("categories", format!("Unknown category: {}", raw)),
            }
        }

        errors.into_result(ValidProfile(ProfileForm {
            name: self.name.trim().to_string(),
            specialty: self.specialty.trim().to_string(),
            bio: self.bio.trim().to_string(),
            categories,
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            spotify_playlist_url,
            featured_tracks,
            favorite_products,
        }))
    }
}

impl ValidProfile {
    pub fn form(&self) -> &ProfileForm {
        &self.0
    }

    /// Apply onto the stored profile: non-blank values replace, blank
    /// values and empty lists keep what is stored
    pub fn merge_into(self, mut existing: InstructorProfile) -> InstructorProfile {
        let form = self.0;

        merge_text(&mut existing.name, form.name);
        merge_text(&mut existing.specialty, form.specialty);
        merge_text(&mut existing.bio, form.bio);
        merge_text(&mut existing.city, form.city);
        merge_text(&mut existing.state, form.state);
        merge_text(&mut existing.spotify_playlist_url, form.spotify_playlist_url);

        if !form.categories.is_empty() {
            existing.categories = form.categories;
        }
        if !form.featured_tracks.is_empty() {
            existing.featured_tracks = form.featured_tracks;
        }
        if !form.favorite_products.is_empty() {
            existing.favorite_products = form.favorite_products;
        }

        existing.updated_at = Utc::now();
        existing
    }
}

fn merge_text(slot: &mut Option<String>, value: String) {
    if !value.is_empty() {
        *slot = Some(value);
    }
}

fn is_web_url(value: &str) -> bool {
    matches!(url::Url::parse(value), Ok(u) if matches!(u.scheme(), "http" | "https") && u.host().is_some())
}

/// Progress of one profile save. Replaces independent uploading/saving flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum SaveState {
    Editing,
    Uploading,
    Saving,
    Saved,
    Failed(String),
}

impl Default for SaveState {
    fn default() -> Self {
        SaveState::Editing
    }
}

impl SaveState {
    pub fn begin_upload(self) -> Self {
        match self {
            SaveState::Editing | SaveState::Failed(_) => SaveState::Uploading,
            other => other.reject("begin_upload"),
        }
    }

    pub fn begin_save(self) -> Self {
        match self {
            SaveState::Editing | SaveState::Uploading | SaveState::Failed(_) => SaveState::Saving,
            other => other.reject("begin_save"),
        }
    }

    /// Settles an in-flight upload or save
    pub fn finish<E: std::fmt::Display>(self, result: &Result<(), E>) -> Self {
        match (self, result) {
            (SaveState::Saving, Ok(())) => SaveState::Saved,
            (SaveState::Uploading | SaveState::Saving, Err(e)) => SaveState::Failed(e.to_string()),
            (other, _) => other.reject("finish"),
        }
    }

    fn reject(self, transition: &str) -> Self {
        warn!("Ignoring {} while profile save is {:?}", transition, self);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn limits() -> ProfileLimits {
        ProfileLimits {
            max_featured_tracks: 4,
            max_favorite_products: 3,
            categories: vec!["Yoga".into(), "HIIT".into(), "Cycling".into()],
        }
    }

    fn product(name: &str, brand: &str, url: &str) -> ProductRecommendation {
        ProductRecommendation {
            product_name: name.into(),
            brand: brand.into(),
            purchase_url: url.into(),
        }
    }

    #[test]
    fn drops_blank_rows_before_counting() {
        let form = ProfileForm {
            featured_tracks: vec![
                FeaturedTrack { song_title: "Levitating".into(), artist: "Dua Lipa".into() },
                FeaturedTrack::default(),
                FeaturedTrack { song_title: "  ".into(), artist: "".into() },
            ],
            favorite_products: vec![ProductRecommendation::default(); 5],
            ..Default::default()
        };
        let valid = form.validate(&limits()).unwrap();
        assert_eq!(valid.form().featured_tracks.len(), 1);
        assert!(valid.form().favorite_products.is_empty());
    }

    #[test]
    fn rejects_too_many_tracks() {
        let track = FeaturedTrack { song_title: "Song".into(), artist: "Artist".into() };
        let form = ProfileForm { featured_tracks: vec![track; 5], ..Default::default() };
        let err = form.validate(&limits()).unwrap_err();
        assert!(err.field_errors.contains_key("featured_tracks"));
    }

    #[test]
    fn product_rows_need_all_fields_and_a_real_url() {
        let form = ProfileForm {
            favorite_products: vec![
                product("Mat", "Manduka", "https://manduka.com/mat"),
                product("Shoes", "", "not a url"),
            ],
            ..Default::default()
        };
        let err = form.validate(&limits()).unwrap_err();
        assert_eq!(err.field_errors["favorite_products[1].brand"], "Brand is required");
        assert_eq!(
            err.field_errors["favorite_products[1].purchase_url"],
            "Purchase link must be a valid URL"
        );
        assert!(!err.field_errors.keys().any(|k| k.starts_with("favorite_products[0]")));
    }

    #[test]
    fn rejects_non_web_urls() {
        let form = ProfileForm {
            favorite_products: vec![product("Mat", "Manduka", "ftp://manduka.com/mat")],
            spotify_playlist_url: "javascript:alert(1)".into(),
            ..Default::default()
        };
        let err = form.validate(&limits()).unwrap_err();
        assert!(err.field_errors.contains_key("favorite_products[0].purchase_url"));
        assert!(err.field_errors.contains_key("spotify_playlist_url"));
    }

    #[test]
    fn categories_are_canonicalized_and_deduplicated() {
        let form = ProfileForm {
            categories: vec!["yoga".into(), "Yoga".into(), " hiit ".into()],
            ..Default::default()
        };
        let valid = form.validate(&limits()).unwrap();
        assert_eq!(valid.form().categories, vec!["Yoga".to_string(), "HIIT".to_string()]);

        let unknown = ProfileForm { categories: vec!["Curling".into()], ..Default::default() };
        assert!(unknown.validate(&limits()).is_err());
    }

    #[test]
    fn merge_keeps_stored_values_for_blank_fields() {
        let mut existing = InstructorProfile::blank(Uuid::new_v4());
        existing.name = Some("Maya Chen".into());
        existing.bio = Some("Flow and breath".into());
        existing.categories = vec!["Yoga".into()];

        let form = ProfileForm {
            name: "  ".into(),
            specialty: "Vinyasa".into(),
            ..Default::default()
        };
        let merged = form.validate(&limits()).unwrap().merge_into(existing.clone());

        assert_eq!(merged.name.as_deref(), Some("Maya Chen"));
        assert_eq!(merged.specialty.as_deref(), Some("Vinyasa"));
        assert_eq!(merged.bio.as_deref(), Some("Flow and breath"));
        assert_eq!(merged.categories, existing.categories);
        assert!(merged.updated_at >= existing.updated_at);
    }

    #[test]
    fn save_state_walks_upload_then_save() {
        let ok: Result<(), String> = Ok(());
        let state = SaveState::default().begin_upload();
        assert_eq!(state, SaveState::Uploading);
        let state = state.begin_save().finish(&ok);
        assert_eq!(state, SaveState::Saved);
    }

    #[test]
    fn save_state_records_failure_reason() {
        let failed = SaveState::Editing.begin_save().finish(&Err::<(), _>("store down"));
        assert_eq!(failed, SaveState::Failed("store down".into()));
        // retry is allowed from failure
        assert_eq!(failed.begin_save(), SaveState::Saving);
    }

    #[test]
    fn save_state_ignores_invalid_transitions() {
        assert_eq!(SaveState::Saved.begin_upload(), SaveState::Saved);
        assert_eq!(SaveState::Editing.finish(&Ok::<(), String>(())), SaveState::Editing);
    }

    #[test]
    fn save_state_serializes_tagged() {
        let json = serde_json::to_value(SaveState::Failed("boom".into())).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["reason"], "boom");
    }
}
