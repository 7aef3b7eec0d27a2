//! Profile persistence over a key-value store.

use crate::error::Result;
use crate::store::KeyValueStore;
use onceupon_core::UserProfile;
use std::sync::Arc;

/// Key holding the serialized profile.
pub const PROFILE_KEY: &str = "user";

/// Reads and writes the single user record as JSON text.
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the stored profile.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet. Unreadable text
    /// is an error.
    pub async fn load(&self) -> Result<Option<UserProfile>> {
        match self.store.get(PROFILE_KEY).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Load the stored profile, starting from an empty one when it is
    /// missing or cannot be read.
    pub async fn load_or_default(&self) -> UserProfile {
        match self.load().await {
            Ok(Some(profile)) => {
                tracing::info!(
                    onboarding_complete = profile.onboarding_complete,
                    events = profile.upcoming_events.len(),
                    "loaded stored profile"
                );
                profile
            }
            Ok(None) => {
                tracing::debug!("no stored profile, starting empty");
                UserProfile::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load profile, starting empty");
                UserProfile::default()
            }
        }
    }

    /// Write `profile` if it has finished onboarding.
    ///
    /// Returns whether anything was written.
    pub async fn save(&self, profile: &UserProfile) -> Result<bool> {
        if !profile.is_persistable() {
            tracing::debug!("onboarding incomplete, profile kept in memory only");
            return Ok(false);
        }
        let text = serde_json::to_string(profile)?;
        self.store.set(PROFILE_KEY, &text).await?;
        Ok(true)
    }

    /// Remove the stored profile.
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(PROFILE_KEY).await
    }
}

impl std::fmt::Debug for ProfileRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileRepository")
            .field("key", &PROFILE_KEY)
            .finish_non_exhaustive()
    }
}
