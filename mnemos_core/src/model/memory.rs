//! Memory-strength state and the due-date record derived from it.
//!
//! One `MemoryState` row exists per (user, card); the store appends a new
//! row per review and only the latest is authoritative for scheduling. One
//! `DueRecord` exists per (user, card, deck) and always mirrors the latest
//! scheduler output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a (user, card) pair with its deck denormalized for lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub user_id: Uuid,
    pub card_id: Uuid,
    pub deck_id: Uuid,
}

/// Latest memory-strength record for a (user, card) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryState {
    pub user_id: Uuid,
    pub card_id: Uuid,
    pub deck_id: Uuid,

    /// SM-2 easiness factor. Never below 1.3 once initialized.
    pub easiness: f64,

    /// Consecutive successful reviews since the last lapse.
    pub repetition: u32,

    /// Interval in days produced by the last scheduling update.
    pub interval_days: u32,

    /// Lifetime review counter, including training reviews.
    pub total_reviews: u32,

    /// Lifetime lapse counter, including training reviews.
    pub total_errors: u32,
}

/// What the store knows about a (user, card) pair.
///
/// The storage layer keeps the legacy `easiness == 0` sentinel for rows
/// that were created without any review history; at the engine boundary
/// that sentinel is lifted into `Fresh` so the scheduler never has to
/// compare floats against zero.
#[derive(Debug, Clone)]
pub enum MemoryTrace {
    /// No review history yet; the scheduler seeds defaults.
    Fresh,
    /// At least one review has been recorded.
    Established(MemoryState),
}

impl MemoryTrace {
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh)
    }
}

/// Next scheduled review for a (user, card, deck) triple.
///
/// Created exactly once per (user, card), the first time the user gains
/// visibility into the card; `next_date` is mutated only as direct
/// scheduler output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueRecord {
    pub user_id: Uuid,
    pub card_id: Uuid,
    pub deck_id: Uuid,
    pub next_date: DateTime<Utc>,
}

impl DueRecord {
    /// A record due immediately, as created on subscription.
    #[must_use]
    pub fn due_now(key: &CardKey, now: DateTime<Utc>) -> Self {
        Self {
            user_id: key.user_id,
            card_id: key.card_id,
            deck_id: key.deck_id,
            next_date: now,
        }
    }
}
