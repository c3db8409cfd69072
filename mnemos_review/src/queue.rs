//! Eligibility queries over due-date records.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Days, NaiveTime, Utc};
use mnemos_core::model::{AccessLevel, DueRecord};
use mnemos_core::DueRecordRepo;
use tracing::debug;
use uuid::Uuid;

use crate::gate::AccessGate;

/// Start of the next UTC calendar day after `as_of`.
///
/// "Due today" means `next_date` falls strictly before this instant. The
/// engine runs on UTC; per-user timezones are a presentation concern.
#[must_use]
pub fn day_cutoff(as_of: DateTime<Utc>) -> DateTime<Utc> {
    (as_of.date_naive() + Days::new(1))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Selects which due-date records are eligible for review right now.
#[derive(Clone)]
pub struct DueQueue {
    due: Arc<dyn DueRecordRepo>,
    gate: AccessGate,
}

impl DueQueue {
    #[must_use]
    pub const fn new(due: Arc<dyn DueRecordRepo>, gate: AccessGate) -> Self {
        Self { due, gate }
    }

    /// Records due before the next calendar day, ascending by `next_date`,
    /// restricted to decks where the user holds at least Student access and
    /// has the deck toggled into the daily queue.
    pub async fn select_due(
        &self,
        user_id: &Uuid,
        as_of: DateTime<Utc>,
    ) -> anyhow::Result<Vec<DueRecord>> {
        let candidates = self.due.list_due_before(user_id, day_cutoff(as_of)).await?;

        // Grants are per deck, so one lookup per deck covers the batch.
        let mut grants = HashMap::new();
        let mut eligible = Vec::with_capacity(candidates.len());
        for record in candidates {
            if !grants.contains_key(&record.deck_id) {
                let grant = self.gate.grant(user_id, &record.deck_id).await;
                grants.insert(record.deck_id, grant);
            }
            let Some(grant) = grants.get(&record.deck_id) else {
                continue;
            };
            if grant.level >= AccessLevel::Student && grant.include_in_daily_queue {
                eligible.push(record);
            }
        }

        debug!(user = %user_id, count = eligible.len(), "selected due records");
        Ok(eligible)
    }

    /// All records for (user, deck) regardless of due date, for unlimited
    /// practice. Still gated at Student.
    pub async fn select_training(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> anyhow::Result<Vec<DueRecord>> {
        self.gate
            .require(user_id, deck_id, AccessLevel::Student)
            .await?;
        self.due.list_for_deck(user_id, deck_id).await
    }
}
