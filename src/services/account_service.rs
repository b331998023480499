use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::auth::{self, AuthError, JwtKeys};
use crate::error::ApiError;
use crate::models::{Account, Role};
use crate::session::{Session, SessionEvent, SessionHub};
use crate::store::{AccountStore, DirectoryStore, StoreError};

/// Token plus the account it was issued for
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub expires_in: i64,
    pub user: Account,
}

pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    directory: Arc<dyn DirectoryStore>,
    keys: JwtKeys,
    hub: SessionHub,
    min_password_length: usize,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        directory: Arc<dyn DirectoryStore>,
        keys: JwtKeys,
        hub: SessionHub,
        min_password_length: usize,
    ) -> Self {
        Self { accounts, directory, keys, hub, min_password_length }
    }

    fn payload(&self, user: Account) -> Result<AuthPayload, ApiError> {
        Ok(AuthPayload {
            token: self.keys.issue(&user)?,
            expires_in: self.keys.expires_in_secs(),
            user,
        })
    }

    /// New accounts always start with the `user` role
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let email = auth::normalize_email(email)?;
        auth::check_password_strength(password, self.min_password_length)?;
        let password_hash = auth::hash_password(password)?;

        let account = match self.accounts.create_account(&email, &password_hash).await {
            Ok(account) => account,
            Err(StoreError::Conflict(_)) => return Err(AuthError::EmailTaken.into()),
            Err(e) => return Err(e.into()),
        };

        info!("Account created: {}", account.id);
        self.hub.publish(SessionEvent::SignedUp { user_id: account.id });
        self.payload(account)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let email = auth::normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let account = self
            .accounts
            .find_account_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !auth::verify_password(password, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.hub.publish(SessionEvent::SignedIn { user_id: account.id });
        self.payload(account)
    }

    /// Tokens are stateless; signing out only notifies subscribers
    pub fn sign_out(&self, session: &Session) {
        self.hub.publish(SessionEvent::SignedOut { user_id: session.user_id });
    }

    /// Current account as stored, which may differ from the token's role
    pub async fn current(&self, session: &Session) -> Result<Account, ApiError> {
        self.accounts
            .find_account(session.user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))
    }

    /// Idempotent; returns a token carrying the instructor role
    pub async fn become_instructor(&self, session: &Session) -> Result<AuthPayload, ApiError> {
        let before = self.current(session).await?;
        let account = self.accounts.elevate_to_instructor(before.id).await?;
        self.directory.ensure_instructor(account.id).await?;

        if before.role != Role::Instructor {
            info!("Account {} elevated to instructor", account.id);
            self.hub.publish(SessionEvent::RoleChanged { user_id: account.id, role: account.role });
        }
        self.payload(account)
    }
}
