use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::forms::{Draft, DraftCache, ProfileForm, ProfileLimits, SaveState};
use crate::models::InstructorProfile;
use crate::session::Session;
use crate::store::{image_extension, BlobStore, DirectoryStore};

#[derive(Debug, Serialize)]
pub struct ProfileSaved {
    pub profile: InstructorProfile,
    #[serde(flatten)]
    pub state: SaveState,
}

/// Instructor-side profile management: edits, headshot upload and drafts
pub struct ProfileService {
    store: Arc<dyn DirectoryStore>,
    blobs: Arc<dyn BlobStore>,
    drafts: Arc<DraftCache>,
    limits: ProfileLimits,
    max_image_bytes: usize,
}

impl ProfileService {
    pub fn new(
        store: Arc<dyn DirectoryStore>,
        blobs: Arc<dyn BlobStore>,
        drafts: Arc<DraftCache>,
        limits: ProfileLimits,
        max_image_bytes: usize,
    ) -> Self {
        Self { store, blobs, drafts, limits, max_image_bytes }
    }

    fn require_instructor(session: &Session) -> Result<(), ApiError> {
        if session.is_instructor() {
            Ok(())
        } else {
            Err(ApiError::role_required("Instructor role required"))
        }
    }

    pub async fn profile(&self, session: &Session) -> Result<InstructorProfile, ApiError> {
        Self::require_instructor(session)?;
        Ok(self.store.ensure_instructor(session.user_id).await?)
    }

    /// Validates before touching the store; clears the draft once saved
    pub async fn save(&self, session: &Session, form: ProfileForm) -> Result<ProfileSaved, ApiError> {
        Self::require_instructor(session)?;
        let valid = form.validate(&self.limits)?;

        let state = SaveState::Editing.begin_save();
        let result = self.persist(session, |existing| valid.merge_into(existing)).await;
        let (profile, state) = settle(state, result)?;
        debug!("Profile save for {} settled as {:?}", session.user_id, state);

        if self.drafts.clear(session.user_id).await {
            debug!("Cleared profile draft for {}", session.user_id);
        }
        info!("Profile saved for {}", session.user_id);
        Ok(ProfileSaved { profile, state })
    }

    /// Stores the headshot, records its URL on the profile, then removes the
    /// owner's headshots in other formats. A failure at any step leaves the
    /// previously stored URL pointing at a file that still exists.
    pub async fn upload_photo(
        &self,
        session: &Session,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<ProfileSaved, ApiError> {
        Self::require_instructor(session)?;
        if image_extension(content_type).is_none() {
            return Err(ApiError::unsupported_media_type(format!(
                "Expected a JPEG, PNG, WebP or GIF image, got {}",
                content_type
            )));
        }
        if bytes.is_empty() {
            return Err(ApiError::bad_request("Image body is empty"));
        }
        if bytes.len() > self.max_image_bytes {
            return Err(ApiError::payload_too_large(format!(
                "Image exceeds {} bytes",
                self.max_image_bytes
            )));
        }

        let state = SaveState::Editing.begin_upload();
        let uploaded = self.blobs.put_image(session.user_id, content_type, bytes).await;
        let url = match uploaded {
            Ok(url) => url,
            Err(e) => {
                let state = state.finish(&Err::<(), _>(&e));
                debug!("Headshot upload for {} settled as {:?}", session.user_id, state);
                return Err(ApiError::save_failed(e.into(), state));
            }
        };

        let state = state.begin_save();
        let result = self
            .persist(session, |mut existing| {
                existing.image_url = Some(url);
                existing.updated_at = chrono::Utc::now();
                existing
            })
            .await;
        let (profile, state) = settle(state, result)?;

        if let Err(e) = self.blobs.prune_images(session.user_id, content_type).await {
            warn!("Could not remove stale headshots for {}: {}", session.user_id, e);
        }
        Ok(ProfileSaved { profile, state })
    }

    async fn persist<F>(&self, session: &Session, apply: F) -> Result<InstructorProfile, ApiError>
    where
        F: FnOnce(InstructorProfile) -> InstructorProfile,
    {
        let existing = self.store.ensure_instructor(session.user_id).await?;
        Ok(self.store.upsert_instructor(&apply(existing)).await?)
    }

    pub async fn draft(&self, session: &Session) -> Result<Draft, ApiError> {
        Self::require_instructor(session)?;
        self.drafts
            .get(session.user_id)
            .await
            .ok_or_else(|| ApiError::not_found("No saved draft"))
    }

    pub async fn save_draft(&self, session: &Session, form: ProfileForm) -> Result<Draft, ApiError> {
        Self::require_instructor(session)?;
        Ok(self.drafts.put(session.user_id, form).await)
    }

    pub async fn discard_draft(&self, session: &Session) -> Result<bool, ApiError> {
        Self::require_instructor(session)?;
        Ok(self.drafts.clear(session.user_id).await)
    }
}

/// Settles an in-flight save; a failure carries the `Failed` state back to the caller
fn settle(
    state: SaveState,
    result: Result<InstructorProfile, ApiError>,
) -> Result<(InstructorProfile, SaveState), ApiError> {
    match result {
        Ok(profile) => Ok((profile, state.finish(&Ok::<(), String>(())))),
        Err(e) => {
            let state = state.finish(&Err::<(), _>(e.message()));
            Err(ApiError::save_failed(e, state))
        }
    }
}
