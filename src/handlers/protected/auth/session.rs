use axum::{extract::State, Extension};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::ApiResponse;
use crate::session::Session;

/// DELETE /api/auth/session - sign out
///
/// Tokens are stateless; the client discards its token and subscribers to
/// session changes see a `signed_out` event.
pub async fn session_delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResponse<Value> {
    state.accounts.sign_out(&session);
    ApiResponse::success(json!({ "signed_out": true }))
}
