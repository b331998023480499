// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::State;

use super::Credentials;
use crate::app::AppState;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::AuthPayload;

/// POST /auth/login - verify credentials and issue a session token
///
/// Unknown email and wrong password both answer 401 "Invalid email or
/// password".
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult<AuthPayload> {
    let payload = state.accounts.sign_in(&body.email, &body.password).await?;
    Ok(ApiResponse::success(payload))
}
