//! Repository implementations over the review database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::debug;
use uuid::Uuid;

use mnemos_core::model::{AccessGrant, Card, Deck, DueRecord, MemoryState, MemoryTrace};
use mnemos_core::repository::{AccessRepo, CardRepo, DueRecordRepo, MemoryStateRepo};
use mnemos_core::CoreError;
use mnemos_entities::{accesses, answers, cards, decks, mem_dates, mems};

use crate::convert;

/// Distractor pool size handed to multiple-choice cards.
const DISTRACTOR_POOL: u64 = 4;

/// Append-only memory-strength store. The latest row wins; older rows are
/// kept as the review audit history.
pub struct DatabaseStateRepo {
    db: DatabaseConnection,
}

impl DatabaseStateRepo {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn latest_model(
        &self,
        user_id: &Uuid,
        card_id: &Uuid,
    ) -> anyhow::Result<Option<mems::Model>> {
        // Uuid v7 ids are time-ordered, so id desc is newest-first.
        let row = mems::Entity::find()
            .filter(mems::Column::UserId.eq(*user_id))
            .filter(mems::Column::CardId.eq(*card_id))
            .order_by_desc(mems::Column::Id)
            .one(&self.db)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl MemoryStateRepo for DatabaseStateRepo {
    async fn latest(&self, user_id: &Uuid, card_id: &Uuid) -> anyhow::Result<MemoryTrace> {
        let trace = match self.latest_model(user_id, card_id).await? {
            // Legacy sentinel: a row written without review history.
            Some(m) if m.easiness < f64::EPSILON => MemoryTrace::Fresh,
            Some(m) => MemoryTrace::Established(convert::state_from_model(m)),
            None => MemoryTrace::Fresh,
        };
        Ok(trace)
    }

    async fn append(&self, state: &MemoryState) -> anyhow::Result<()> {
        let stored_reviews = self
            .latest_model(&state.user_id, &state.card_id)
            .await?
            .map_or(0, |m| u32::try_from(m.total_reviews).unwrap_or(0));

        // The scheduler bumps total_reviews by exactly one per update, so
        // anything else means a racing writer got here first.
        if state.total_reviews != stored_reviews + 1 {
            return Err(CoreError::Conflict(format!(
                "memory state for card {} moved from {} reviews",
                state.card_id, stored_reviews
            ))
            .into());
        }

        convert::state_to_model(state, Utc::now())
            .insert(&self.db)
            .await?;
        Ok(())
    }
}

/// Due-date records, one per (user, card).
pub struct DatabaseDueRepo {
    db: DatabaseConnection,
}

impl DatabaseDueRepo {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(
        &self,
        user_id: &Uuid,
        card_id: &Uuid,
    ) -> anyhow::Result<Option<mem_dates::Model>> {
        let row = mem_dates::Entity::find()
            .filter(mem_dates::Column::UserId.eq(*user_id))
            .filter(mem_dates::Column::CardId.eq(*card_id))
            .one(&self.db)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl DueRecordRepo for DatabaseDueRepo {
    async fn create_if_absent(&self, record: &DueRecord) -> anyhow::Result<bool> {
        if self
            .find_model(&record.user_id, &record.card_id)
            .await?
            .is_some()
        {
            debug!(card = %record.card_id, "due record already exists, skipping");
            return Ok(false);
        }

        let now = Utc::now();
        mem_dates::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(record.user_id),
            card_id: Set(record.card_id),
            deck_id: Set(record.deck_id),
            next_date: Set(record.next_date.into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;
        Ok(true)
    }

    async fn find(&self, user_id: &Uuid, card_id: &Uuid) -> anyhow::Result<Option<DueRecord>> {
        Ok(self
            .find_model(user_id, card_id)
            .await?
            .map(convert::due_from_model))
    }

    async fn put(&self, record: &DueRecord) -> anyhow::Result<()> {
        match self.find_model(&record.user_id, &record.card_id).await? {
            Some(model) => {
                let mut active: mem_dates::ActiveModel = model.into();
                active.next_date = Set(record.next_date.into());
                active.updated_at = Set(Utc::now().into());
                active.update(&self.db).await?;
            }
            None => {
                self.create_if_absent(record).await?;
            }
        }
        Ok(())
    }

    async fn list_due_before(
        &self,
        user_id: &Uuid,
        cutoff: DateTime<Utc>,
    ) -> anyhow::Result<Vec<DueRecord>> {
        let rows = mem_dates::Entity::find()
            .filter(mem_dates::Column::UserId.eq(*user_id))
            .filter(mem_dates::Column::NextDate.lt(cutoff))
            .order_by_asc(mem_dates::Column::NextDate)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(convert::due_from_model).collect())
    }

    async fn list_for_deck(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> anyhow::Result<Vec<DueRecord>> {
        let rows = mem_dates::Entity::find()
            .filter(mem_dates::Column::UserId.eq(*user_id))
            .filter(mem_dates::Column::DeckId.eq(*deck_id))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(convert::due_from_model).collect())
    }
}

/// Access grants keyed by (user, deck).
pub struct DatabaseAccessRepo {
    db: DatabaseConnection,
}

impl DatabaseAccessRepo {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> anyhow::Result<Option<accesses::Model>> {
        let row = accesses::Entity::find()
            .filter(accesses::Column::UserId.eq(*user_id))
            .filter(accesses::Column::DeckId.eq(*deck_id))
            .one(&self.db)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl AccessRepo for DatabaseAccessRepo {
    async fn find_grant(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> anyhow::Result<Option<AccessGrant>> {
        Ok(self
            .find_model(user_id, deck_id)
            .await?
            .map(convert::grant_from_model))
    }

    async fn upsert_grant(&self, grant: &AccessGrant) -> anyhow::Result<()> {
        let now = Utc::now();
        match self.find_model(&grant.user_id, &grant.deck_id).await? {
            Some(model) => {
                let mut active: accesses::ActiveModel = model.into();
                active.level = Set(grant.level.as_str().to_string());
                active.include_daily = Set(grant.include_in_daily_queue);
                active.updated_at = Set(now.into());
                active.update(&self.db).await?;
            }
            None => {
                accesses::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    user_id: Set(grant.user_id),
                    deck_id: Set(grant.deck_id),
                    level: Set(grant.level.as_str().to_string()),
                    include_daily: Set(grant.include_in_daily_queue),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                }
                .insert(&self.db)
                .await?;
            }
        }
        Ok(())
    }

    async fn subscribers(&self, deck_id: &Uuid) -> anyhow::Result<Vec<Uuid>> {
        let rows = accesses::Entity::find()
            .filter(accesses::Column::DeckId.eq(*deck_id))
            .filter(accesses::Column::Level.ne("none"))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|m| m.user_id).collect())
    }
}

/// Read-only card and deck catalog.
pub struct DatabaseCardRepo {
    db: DatabaseConnection,
}

impl DatabaseCardRepo {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CardRepo for DatabaseCardRepo {
    async fn find_card(&self, card_id: &Uuid) -> anyhow::Result<Option<Card>> {
        let row = cards::Entity::find_by_id(*card_id).one(&self.db).await?;
        Ok(row.map(convert::card_from_model))
    }

    async fn find_deck(&self, deck_id: &Uuid) -> anyhow::Result<Option<Deck>> {
        let row = decks::Entity::find_by_id(*deck_id).one(&self.db).await?;
        Ok(row.map(convert::deck_from_model))
    }

    async fn cards_in_deck(&self, deck_id: &Uuid) -> anyhow::Result<Vec<Card>> {
        let rows = cards::Entity::find()
            .filter(cards::Column::DeckId.eq(*deck_id))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(convert::card_from_model).collect())
    }

    async fn distractors(&self, card_id: &Uuid) -> anyhow::Result<Vec<String>> {
        let rows = answers::Entity::find()
            .filter(answers::Column::CardId.eq(*card_id))
            .limit(DISTRACTOR_POOL)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|m| m.answer).collect())
    }
}
