// handlers/public/auth/signup.rs - POST /auth/signup handler

use axum::extract::State;

use super::Credentials;
use crate::app::AppState;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::AuthPayload;

/// POST /auth/signup - create an account with the `user` role and sign it in
///
/// Input: `{"email": "...", "password": "..."}`
///
/// Output (201): `{"success": true, "data": {"token", "expires_in", "user"}}`.
/// A malformed email or short password is a 400 with `field_errors`; an
/// email that is already registered is a 409.
pub async fn signup_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult<AuthPayload> {
    let payload = state.accounts.sign_up(&body.email, &body.password).await?;
    Ok(ApiResponse::created(payload))
}
