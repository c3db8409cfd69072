//! Per-deck permission levels and the grant record that carries them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Ordered permission scale a user holds on a deck.
///
/// Comparison semantics are defined once here, via the derived ordering on
/// declaration order: `None < Student < Editor < Owner`. Every permission
/// check in the engine goes through `>=` on this type.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AccessLevel {
    /// No grant, or a revoked grant. Resolves every check to denied.
    #[default]
    None = 0,
    /// May review cards in the deck.
    Student = 1,
    /// May edit cards in the deck.
    Editor = 2,
    /// May edit, delete, and publish the deck.
    Owner = 3,
}

impl AccessLevel {
    /// Returns the string representation of this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Student => "student",
            Self::Editor => "editor",
            Self::Owner => "owner",
        }
    }
}

impl FromStr for AccessLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "student" => Ok(Self::Student),
            "editor" => Ok(Self::Editor),
            "owner" => Ok(Self::Owner),
            _ => Err("unknown access level"),
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One grant row per (user, deck).
///
/// `include_in_daily_queue` is the user-level toggle deciding whether the
/// deck's due records may appear in the "today" batch at all. It is a
/// per-user-per-deck setting, not per-card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessGrant {
    pub user_id: Uuid,
    pub deck_id: Uuid,
    pub level: AccessLevel,
    pub include_in_daily_queue: bool,
}

impl AccessGrant {
    /// The grant resolved when no row exists: no access, excluded from today.
    #[must_use]
    pub const fn denied(user_id: Uuid, deck_id: Uuid) -> Self {
        Self {
            user_id,
            deck_id,
            level: AccessLevel::None,
            include_in_daily_queue: false,
        }
    }
}
