//! Repository contracts at the engine boundary.
//!
//! Persistence is owned elsewhere; the engine reads and writes through
//! these narrow traits and is handed implementations at construction time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{AccessGrant, Card, Deck, DueRecord, MemoryState, MemoryTrace};

/// Memory-strength records, keyed by (user, card), latest-wins.
#[async_trait]
pub trait MemoryStateRepo: Send + Sync {
    /// Latest state for the pair, with the storage sentinel lifted to
    /// [`MemoryTrace::Fresh`] when no history exists.
    async fn latest(&self, user_id: &Uuid, card_id: &Uuid) -> anyhow::Result<MemoryTrace>;

    /// Append a new state row. Implementations must reject the write with
    /// [`crate::CoreError::Conflict`] when `state.total_reviews` does not
    /// follow directly from the stored latest row, so a racing second
    /// reviewer fails fast instead of corrupting the streak counters.
    async fn append(&self, state: &MemoryState) -> anyhow::Result<()>;
}

/// Next-review pointers, one per (user, card, deck).
#[async_trait]
pub trait DueRecordRepo: Send + Sync {
    /// Idempotent creation on the (user, card) key. Returns `true` only
    /// when a new record was created.
    async fn create_if_absent(&self, record: &DueRecord) -> anyhow::Result<bool>;

    async fn find(&self, user_id: &Uuid, card_id: &Uuid) -> anyhow::Result<Option<DueRecord>>;

    /// Replace the record for (user, card) with the scheduler's output.
    async fn put(&self, record: &DueRecord) -> anyhow::Result<()>;

    /// All records for the user with `next_date < cutoff`, ascending by
    /// `next_date`. Permission filtering happens above this layer.
    async fn list_due_before(
        &self,
        user_id: &Uuid,
        cutoff: DateTime<Utc>,
    ) -> anyhow::Result<Vec<DueRecord>>;

    /// All records for (user, deck) regardless of due date.
    async fn list_for_deck(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> anyhow::Result<Vec<DueRecord>>;
}

/// Access grants, keyed by (user, deck).
#[async_trait]
pub trait AccessRepo: Send + Sync {
    async fn find_grant(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> anyhow::Result<Option<AccessGrant>>;

    async fn upsert_grant(&self, grant: &AccessGrant) -> anyhow::Result<()>;

    /// Users holding any grant above `None` on the deck.
    async fn subscribers(&self, deck_id: &Uuid) -> anyhow::Result<Vec<Uuid>>;
}

/// Card and deck catalog, read-only from the engine's perspective.
#[async_trait]
pub trait CardRepo: Send + Sync {
    async fn find_card(&self, card_id: &Uuid) -> anyhow::Result<Option<Card>>;

    async fn find_deck(&self, deck_id: &Uuid) -> anyhow::Result<Option<Deck>>;

    async fn cards_in_deck(&self, deck_id: &Uuid) -> anyhow::Result<Vec<Card>>;

    /// Candidate answers for a multiple-choice card: the correct one plus
    /// distractors, at most four strings. May return fewer.
    async fn distractors(&self, card_id: &Uuid) -> anyhow::Result<Vec<String>>;
}

/// Notification emitted to the audit sink.
#[derive(Debug, Clone)]
pub enum AuditEvent {
    /// A review fell below the success threshold and reset the streak.
    Lapse { user_id: Uuid, card_id: Uuid },
    /// A due record was created for a newly visible card.
    RecordCreated { user_id: Uuid, card_id: Uuid },
    /// A record was degraded or skipped during batch assembly.
    AssemblyDegraded { user_id: Uuid, card_id: Uuid },
}

/// Fire-and-forget audit trail. Failure to log never fails an operation,
/// so the contract is infallible; implementations swallow their own errors.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn notify(&self, event: AuditEvent);
}
