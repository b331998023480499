//! Demo data loading for the CLI and the integration tests.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

use crate::app::Stores;
use crate::auth;
use crate::forms::{ProfileForm, ProfileLimits, ReviewForm};
use crate::models::Account;

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureAccount {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureInstructor {
    #[serde(flatten)]
    pub account: FixtureAccount,
    #[serde(default)]
    pub profile: ProfileForm,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureReview {
    /// Instructor email
    pub instructor: String,
    /// Reviewer email
    pub reviewer: String,
    #[serde(flatten)]
    pub form: ReviewForm,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub instructors: Vec<FixtureInstructor>,
    #[serde(default)]
    pub reviewers: Vec<FixtureAccount>,
    #[serde(default)]
    pub reviews: Vec<FixtureReview>,
}

#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    pub accounts_created: usize,
    pub instructors: usize,
    pub reviews: usize,
}

impl Fixture {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Loads the fixture into the stores. Re-running is safe: existing
    /// accounts are reused and reviews are upserted.
    pub async fn seed(&self, stores: &Stores, limits: &ProfileLimits) -> anyhow::Result<SeedReport> {
        let mut report = SeedReport::default();
        let mut ids: HashMap<String, Uuid> = HashMap::new();

        for instructor in &self.instructors {
            let account = ensure_account(stores, &instructor.account, &mut report).await?;
            stores.accounts.elevate_to_instructor(account.id).await?;
            let existing = stores.directory.ensure_instructor(account.id).await?;

            let profile = instructor
                .profile
                .clone()
                .validate(limits)
                .with_context(|| format!("profile for {}", account.email))?
                .merge_into(existing);
            stores.directory.upsert_instructor(&profile).await?;

            debug!("Seeded instructor {}", account.email);
            report.instructors += 1;
            ids.insert(account.email, account.id);
        }

        for reviewer in &self.reviewers {
            let account = ensure_account(stores, reviewer, &mut report).await?;
            ids.insert(account.email, account.id);
        }

        for review in &self.reviews {
            let lookup = |email: &str| -> anyhow::Result<Uuid> {
                let email = auth::normalize_email(email)?;
                ids.get(&email)
                    .copied()
                    .with_context(|| format!("review references unknown account {}", email))
            };
            let instructor_id = lookup(&review.instructor)?;
            let reviewer_id = lookup(&review.reviewer)?;

            let draft = review
                .form
                .clone()
                .validate(instructor_id, reviewer_id)
                .with_context(|| format!("review of {} by {}", review.instructor, review.reviewer))?;
            stores.directory.upsert_review(&draft).await?;
            report.reviews += 1;
        }

        info!(
            "Fixture loaded: {} instructors, {} reviews, {} new accounts",
            report.instructors, report.reviews, report.accounts_created
        );
        Ok(report)
    }
}

async fn ensure_account(stores: &Stores, account: &FixtureAccount, report: &mut SeedReport) -> anyhow::Result<Account> {
    let email = auth::normalize_email(&account.email)?;
    if let Some(existing) = stores.accounts.find_account_by_email(&email).await? {
        return Ok(existing);
    }
    let hash = auth::hash_password(&account.password)?;
    let created = stores.accounts.create_account(&email, &hash).await?;
    report.accounts_created += 1;
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::summarize_by_instructor;

    fn limits() -> ProfileLimits {
        ProfileLimits { max_featured_tracks: 4, max_favorite_products: 3, categories: vec![] }
    }

    fn fixture() -> Fixture {
        serde_json::from_value(serde_json::json!({
            "instructors": [
                {"email": "maya@example.com", "password": "password1",
                 "profile": {"name": "Maya Chen", "categories": ["Yoga"], "city": "Austin", "state": "TX"}}
            ],
            "reviewers": [{"email": "sam@example.com", "password": "password1"}],
            "reviews": [
                {"instructor": "maya@example.com", "reviewer": "sam@example.com", "rating": 5, "body": "Calm and precise"}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn seeding_twice_is_stable() {
        let stores = Stores::memory();
        let first = fixture().seed(&stores, &limits()).await.unwrap();
        assert_eq!(first.accounts_created, 2);
        assert_eq!(first.reviews, 1);

        let second = fixture().seed(&stores, &limits()).await.unwrap();
        assert_eq!(second.accounts_created, 0);

        let ratings = stores.directory.all_ratings().await.unwrap();
        assert_eq!(ratings.len(), 1);
        let profiles = stores.directory.list_instructors().await.unwrap();
        assert_eq!(profiles[0].name.as_deref(), Some("Maya Chen"));
        assert_eq!(summarize_by_instructor(&ratings)[&profiles[0].id].average, Some(5.0));
    }

    #[tokio::test]
    async fn unknown_review_account_fails() {
        let mut fx = fixture();
        fx.reviews[0].reviewer = "ghost@example.com".into();
        assert!(fx.seed(&Stores::memory(), &limits()).await.is_err());
    }
}
