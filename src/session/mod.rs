//! Explicit per-request session plus one subscription point for session changes.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::auth::Claims;
use crate::models::{Account, Role};

/// Authenticated caller, injected into each protected request by middleware
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn is_instructor(&self) -> bool {
        self.role == Role::Instructor
    }
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

impl From<&Account> for Session {
    fn from(account: &Account) -> Self {
        Self {
            user_id: account.id,
            email: account.email.clone(),
            role: account.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedUp { user_id: Uuid },
    SignedIn { user_id: Uuid },
    SignedOut { user_id: Uuid },
    RoleChanged { user_id: Uuid, role: Role },
}

/// Fan-out of session changes to whoever subscribed
#[derive(Clone)]
pub struct SessionHub {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: SessionEvent) {
        tracing::debug!("session event: {:?}", event);
        // No subscribers is fine
        let _ = self.tx.send(event);
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Logs every session change; runs until the hub is dropped
pub async fn log_session_events(mut rx: broadcast::Receiver<SessionEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => tracing::info!("session change: {:?}", event),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("session log lagged, skipped {} events", n);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
