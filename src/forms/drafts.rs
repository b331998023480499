use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ProfileForm;

#[derive(Debug, Clone, Serialize)]
pub struct Draft {
    pub form: ProfileForm,
    pub saved_at: DateTime<Utc>,
}

/// Unsaved profile edits per account, kept until the profile is saved or
/// the draft is discarded. Not persisted across restarts.
#[derive(Debug, Default)]
pub struct DraftCache {
    drafts: RwLock<HashMap<Uuid, Draft>>,
}

impl DraftCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, owner: Uuid) -> Option<Draft> {
        self.drafts.read().await.get(&owner).cloned()
    }

    pub async fn put(&self, owner: Uuid, form: ProfileForm) -> Draft {
        let draft = Draft { form, saved_at: Utc::now() };
        self.drafts.write().await.insert(owner, draft.clone());
        draft
    }

    /// Returns whether a draft was present
    pub async fn clear(&self, owner: Uuid) -> bool {
        self.drafts.write().await.remove(&owner).is_some()
    }
}
