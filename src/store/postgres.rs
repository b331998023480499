use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use std::time::{Duration, Instant};
use tracing::warn;
use uuid::Uuid;

use super::{AccountStore, DirectoryStore, ReviewQuery, StoreError};
use crate::database::{DatabaseError, DatabaseManager, SortDirection, SqlQuery};
use crate::models::{Account, FeaturedTrack, InstructorProfile, ProductRecommendation, Review, ReviewDraft, Role};

const ACCOUNTS: &str = "accounts";
const INSTRUCTORS: &str = "instructor_profiles";
const REVIEWS: &str = "reviews";

/// Record store backed by Postgres via sqlx
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseManager,
    slow_query_threshold: Duration,
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| DatabaseError::QueryError(format!("unknown role '{}' on account {}", row.role, row.id)))?;
        Ok(Account {
            id: row.id,
            email: row.email,
            role,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct InstructorRow {
    id: Uuid,
    name: Option<String>,
    specialty: Option<String>,
    bio: Option<String>,
    image_url: Option<String>,
    categories: Vec<String>,
    city: Option<String>,
    state: Option<String>,
    spotify_playlist_url: Option<String>,
    featured_tracks: Json<Vec<FeaturedTrack>>,
    favorite_products: Json<Vec<ProductRecommendation>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InstructorRow> for InstructorProfile {
    fn from(row: InstructorRow) -> Self {
        InstructorProfile {
            id: row.id,
            name: row.name,
            specialty: row.specialty,
            bio: row.bio,
            image_url: row.image_url,
            categories: row.categories,
            city: row.city,
            state: row.state,
            spotify_playlist_url: row.spotify_playlist_url,
            featured_tracks: row.featured_tracks.0,
            favorite_products: row.favorite_products.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl PgStore {
    pub fn new(db: DatabaseManager, slow_query_threshold_ms: u64) -> Self {
        Self {
            db,
            slow_query_threshold: Duration::from_millis(slow_query_threshold_ms),
        }
    }

    fn note_duration(&self, what: &str, started: Instant) {
        let elapsed = started.elapsed();
        if elapsed > self.slow_query_threshold {
            warn!("Slow query ({}): {}ms", what, elapsed.as_millis());
        }
    }

    async fn account_where(&self, column: &str, value: impl Into<crate::database::SqlParam>) -> Result<Option<Account>, StoreError> {
        let started = Instant::now();
        let row: Option<AccountRow> = SqlQuery::new(ACCOUNTS)?
            .where_eq(column, value)?
            .fetch_optional(self.db.pool())
            .await?;
        self.note_duration("account lookup", started);
        row.map(Account::try_from).transpose()
    }
}

fn map_write_error(err: sqlx::Error, conflict: &str, missing: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(conflict.to_string()),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::NotFound(missing.to_string()),
        _ => err.into(),
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account, StoreError> {
        let row: AccountRow = sqlx::query_as(
            "INSERT INTO accounts (id, email, role, password_hash) VALUES ($1, $2, 'user', $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| map_write_error(e, &format!("account {} already exists", email), "account"))?;
        row.try_into()
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.account_where("email", email).await
    }

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        self.account_where("id", id).await
    }

    async fn elevate_to_instructor(&self, id: Uuid) -> Result<Account, StoreError> {
        let row: Option<AccountRow> =
            sqlx::query_as("UPDATE accounts SET role = 'instructor' WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;
        row.ok_or_else(|| StoreError::NotFound(format!("account {}", id)))?.try_into()
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let rows: Vec<AccountRow> = SqlQuery::new(ACCOUNTS)?
            .order_str("created_at asc, email asc")?
            .fetch_all(self.db.pool())
            .await?;
        rows.into_iter().map(Account::try_from).collect()
    }
}

#[async_trait]
impl DirectoryStore for PgStore {
    async fn list_instructors(&self) -> Result<Vec<InstructorProfile>, StoreError> {
        let started = Instant::now();
        let rows: Vec<InstructorRow> = SqlQuery::new(INSTRUCTORS)?
            .order_by("created_at", SortDirection::Desc)?
            .order_by("id", SortDirection::Asc)?
            .fetch_all(self.db.pool())
            .await?;
        self.note_duration("list instructors", started);
        Ok(rows.into_iter().map(InstructorProfile::from).collect())
    }

    async fn get_instructor(&self, id: Uuid) -> Result<Option<InstructorProfile>, StoreError> {
        let row: Option<InstructorRow> = SqlQuery::new(INSTRUCTORS)?
            .where_eq("id", id)?
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.map(InstructorProfile::from))
    }

    async fn ensure_instructor(&self, id: Uuid) -> Result<InstructorProfile, StoreError> {
        sqlx::query("INSERT INTO instructor_profiles (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(id)
            .execute(self.db.pool())
            .await
            .map_err(|e| map_write_error(e, "instructor profile", &format!("account {}", id)))?;
        self.get_instructor(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("instructor {}", id)))
    }

    async fn upsert_instructor(&self, profile: &InstructorProfile) -> Result<InstructorProfile, StoreError> {
        let row: InstructorRow = sqlx::query_as(
            r#"
            INSERT INTO instructor_profiles
                (id, name, specialty, bio, image_url, categories, city, state,
                 spotify_playlist_url, featured_tracks, favorite_products, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                specialty = EXCLUDED.specialty,
                bio = EXCLUDED.bio,
                image_url = EXCLUDED.image_url,
                categories = EXCLUDED.categories,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                spotify_playlist_url = EXCLUDED.spotify_playlist_url,
                featured_tracks = EXCLUDED.featured_tracks,
                favorite_products = EXCLUDED.favorite_products,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.specialty)
        .bind(&profile.bio)
        .bind(&profile.image_url)
        .bind(&profile.categories)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.spotify_playlist_url)
        .bind(Json(&profile.featured_tracks))
        .bind(Json(&profile.favorite_products))
        .bind(profile.updated_at)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| map_write_error(e, "instructor profile", &format!("account {}", profile.id)))?;
        Ok(row.into())
    }

    async fn find_reviews(&self, query: &ReviewQuery) -> Result<Vec<Review>, StoreError> {
        let mut sql = SqlQuery::new(REVIEWS)?;
        if let Some(id) = query.instructor_id {
            sql = sql.where_eq("instructor_id", id)?;
        }
        if let Some(id) = query.reviewer_id {
            sql = sql.where_eq("reviewer_id", id)?;
        }
        sql = sql.order_str(query.order.as_order_str())?;
        if let Some(limit) = query.limit {
            sql = sql.limit(i64::try_from(limit).unwrap_or(i64::MAX))?;
        }

        let started = Instant::now();
        let reviews = sql.fetch_all::<Review>(self.db.pool()).await?;
        self.note_duration("find reviews", started);
        Ok(reviews)
    }

    async fn all_ratings(&self) -> Result<Vec<(Uuid, i32)>, StoreError> {
        let started = Instant::now();
        let ratings = SqlQuery::new(REVIEWS)?
            .select(&["instructor_id", "rating"])?
            .fetch_all::<(Uuid, i32)>(self.db.pool())
            .await?;
        self.note_duration("all ratings", started);
        Ok(ratings)
    }

    async fn upsert_review(&self, draft: &ReviewDraft) -> Result<Review, StoreError> {
        let review: Review = sqlx::query_as(
            r#"
            INSERT INTO reviews
                (id, instructor_id, reviewer_id, rating, body, music_score, difficulty_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (instructor_id, reviewer_id) DO UPDATE SET
                rating = EXCLUDED.rating,
                body = EXCLUDED.body,
                music_score = EXCLUDED.music_score,
                difficulty_score = EXCLUDED.difficulty_score,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(draft.instructor_id)
        .bind(draft.reviewer_id)
        .bind(draft.rating)
        .bind(&draft.body)
        .bind(draft.music_score)
        .bind(draft.difficulty_score)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| map_write_error(e, "review", &format!("instructor {}", draft.instructor_id)))?;
        Ok(review)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.db
            .health_check()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
