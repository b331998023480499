//! Application state and router assembly shared by the server binary and
//! the integration tests.

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::auth::JwtKeys;
use crate::config::{AppConfig, DatabaseConfig, StoreBackend};
use crate::database::DatabaseManager;
use crate::forms::{DraftCache, ProfileLimits};
use crate::handlers::{instructor, protected, public};
use crate::middleware::{jwt_auth_middleware, require_instructor_middleware};
use crate::services::{AccountService, DirectoryService, ProfileService, ReviewService};
use crate::session::SessionHub;
use crate::store::{AccountStore, BlobStore, DirectoryStore, FsBlobStore, MemoryStore, PgStore};

/// Record-store handles for whichever backend is configured
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountStore>,
    pub directory: Arc<dyn DirectoryStore>,
}

impl Stores {
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self { accounts: store.clone(), directory: store }
    }

    pub async fn open(config: &DatabaseConfig) -> anyhow::Result<Self> {
        match config.backend {
            StoreBackend::Memory => {
                warn!("Using in-memory record store; data is lost on exit");
                Ok(Self::memory())
            }
            StoreBackend::Postgres => {
                let db = DatabaseManager::connect(config)
                    .await
                    .context("connecting to Postgres")?;
                let store = Arc::new(PgStore::new(db, config.slow_query_threshold_ms));
                Ok(Self { accounts: store.clone(), directory: store })
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: Arc<JwtKeys>,
    pub sessions: SessionHub,
    pub accounts: Arc<AccountService>,
    pub directory: Arc<DirectoryService>,
    pub profiles: Arc<ProfileService>,
    pub reviews: Arc<ReviewService>,
}

impl AppState {
    pub fn new(config: AppConfig, stores: Stores, blobs: Arc<dyn BlobStore>) -> Self {
        let keys = JwtKeys::from_config(&config.security);
        let sessions = SessionHub::default();

        let accounts = AccountService::new(
            stores.accounts.clone(),
            stores.directory.clone(),
            keys.clone(),
            sessions.clone(),
            config.security.min_password_length,
        );
        let directory = DirectoryService::new(stores.directory.clone(), config.directory.top_n);
        let profiles = ProfileService::new(
            stores.directory.clone(),
            blobs,
            Arc::new(DraftCache::new()),
            ProfileLimits::from(&config.directory),
            config.storage.max_image_bytes,
        );
        let reviews = ReviewService::new(stores.directory);

        Self {
            config: Arc::new(config),
            keys: Arc::new(keys),
            sessions,
            accounts: Arc::new(accounts),
            directory: Arc::new(directory),
            profiles: Arc::new(profiles),
            reviews: Arc::new(reviews),
        }
    }
}

/// Opens the configured stores and wires up the services
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    anyhow::ensure!(
        !config.security.jwt_secret.is_empty(),
        "JWT_SECRET must be set outside development"
    );

    let stores = Stores::open(&config.database).await?;
    tokio::fs::create_dir_all(&config.storage.media_root)
        .await
        .with_context(|| format!("creating media root {}", config.storage.media_root.display()))?;
    let blobs = Arc::new(FsBlobStore::from_config(&config.storage));

    Ok(AppState::new(config, stores, blobs))
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let public_routes = Router::new()
        .route("/", get(public::root::root))
        .route("/health", get(public::root::health))
        .route("/auth/signup", post(public::auth::signup_post))
        .route("/auth/login", post(public::auth::login_post))
        .route("/instructors", get(public::instructors::instructors_get))
        .route("/instructors/top", get(public::instructors::top_get))
        .route("/instructors/locations", get(public::instructors::locations_get))
        .route("/instructors/:id", get(public::instructors::instructor_get));

    let protected_routes = Router::new()
        .route("/api/auth/whoami", get(protected::auth::whoami_get))
        .route("/api/auth/session", axum::routing::delete(protected::auth::session_delete))
        .route("/api/auth/become-instructor", post(protected::auth::become_instructor_post))
        .route(
            "/api/reviews/:instructor_id",
            get(protected::reviews::review_get).put(protected::reviews::review_put),
        )
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let instructor_routes = Router::new()
        .route(
            "/api/instructor/profile",
            get(instructor::profile_get).put(instructor::profile_put),
        )
        .route(
            "/api/instructor/photo",
            put(instructor::photo_put).layer(DefaultBodyLimit::max(config.storage.max_image_bytes.saturating_mul(2))),
        )
        .route(
            "/api/instructor/draft",
            get(instructor::draft_get)
                .put(instructor::draft_put)
                .delete(instructor::draft_delete),
        )
        .route_layer(from_fn(require_instructor_middleware))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(instructor_routes)
        .nest_service("/media", ServeDir::new(&config.storage.media_root))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Serves until the listener fails; the session log runs alongside
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    tokio::spawn(crate::session::log_session_events(state.sessions.subscribe()));

    let addr = listener.local_addr()?;
    info!("FitReview API listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
