//! Permission resolution per (user, deck).

use std::sync::Arc;

use mnemos_core::model::{AccessGrant, AccessLevel};
use mnemos_core::{AccessRepo, CoreError};
use tracing::debug;
use uuid::Uuid;

/// Resolves the permission a user holds on a deck and filters accordingly.
///
/// A missing grant, and equally a failed lookup, resolves to
/// [`AccessLevel::None`]: callers uniformly treat "no grant" as "no
/// access", never as an error.
#[derive(Clone)]
pub struct AccessGate {
    access: Arc<dyn AccessRepo>,
}

impl AccessGate {
    #[must_use]
    pub const fn new(access: Arc<dyn AccessRepo>) -> Self {
        Self { access }
    }

    /// The full grant for (user, deck), defaulting to denied.
    pub async fn grant(&self, user_id: &Uuid, deck_id: &Uuid) -> AccessGrant {
        match self.access.find_grant(user_id, deck_id).await {
            Ok(Some(grant)) => grant,
            Ok(None) => AccessGrant::denied(*user_id, *deck_id),
            Err(err) => {
                debug!(deck = %deck_id, "grant lookup failed, resolving to none: {err}");
                AccessGrant::denied(*user_id, *deck_id)
            }
        }
    }

    /// The permission level for (user, deck).
    pub async fn permission(&self, user_id: &Uuid, deck_id: &Uuid) -> AccessLevel {
        self.grant(user_id, deck_id).await.level
    }

    /// Fails with [`CoreError::PermissionDenied`] below `required`.
    pub async fn require(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
        required: AccessLevel,
    ) -> Result<(), CoreError> {
        if self.permission(user_id, deck_id).await >= required {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied)
        }
    }
}
