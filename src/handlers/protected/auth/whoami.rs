use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Account;
use crate::session::Session;

/// GET /api/auth/whoami - the caller's account as currently stored
///
/// The role is re-read rather than taken from the token, so a client holding
/// a token issued before role elevation still sees `instructor` here.
pub async fn whoami_get(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Account> {
    Ok(ApiResponse::success(state.accounts.current(&session).await?))
}
