//! Orchestration of the review flows: submission, batch fetch, and
//! subscription bookkeeping.
//!
//! The service owns no persistence itself; everything is injected as
//! repository trait objects at construction time, and a single (user, card)
//! pair is expected to have at most one in-flight review at a time — the
//! state store fails fast on racing writers.

use std::sync::Arc;

use chrono::Utc;
use mnemos_core::model::{AccessGrant, AccessLevel, Card, CardKey, DeckStatus, DueRecord};
use mnemos_core::repository::{
    AccessRepo, AuditEvent, AuditSink, CardRepo, DueRecordRepo, MemoryStateRepo,
};
use mnemos_core::scheduler::{self, ReviewMode, ReviewOutcome};
use mnemos_core::{CoreError, MemoryState};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::assembler::{Assembler, ReviewCard, TodayBatch};
use crate::gate::AccessGate;
use crate::queue::DueQueue;

/// Result of checking a free-text response against a card.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerCheck {
    pub correct: bool,
    pub message: &'static str,
}

impl AnswerCheck {
    const fn from_bool(correct: bool) -> Self {
        Self {
            correct,
            message: if correct {
                "Correct answer"
            } else {
                "Wrong answer"
            },
        }
    }
}

/// The engine's inbound boundary. HTTP controllers (out of scope here)
/// authenticate the user and hand validated identifiers down.
#[derive(Clone)]
pub struct ReviewService {
    states: Arc<dyn MemoryStateRepo>,
    due: Arc<dyn DueRecordRepo>,
    access: Arc<dyn AccessRepo>,
    cards: Arc<dyn CardRepo>,
    audit: Arc<dyn AuditSink>,
    gate: AccessGate,
    queue: DueQueue,
    assembler: Assembler,
}

impl ReviewService {
    #[must_use]
    pub fn new(
        states: Arc<dyn MemoryStateRepo>,
        due: Arc<dyn DueRecordRepo>,
        access: Arc<dyn AccessRepo>,
        cards: Arc<dyn CardRepo>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let gate = AccessGate::new(Arc::clone(&access));
        let queue = DueQueue::new(Arc::clone(&due), gate.clone());
        let assembler = Assembler::new(Arc::clone(&cards), Arc::clone(&audit));
        Self {
            states,
            due,
            access,
            cards,
            audit,
            gate,
            queue,
            assembler,
        }
    }

    /// Apply one review: schedule update plus persistence of the state/due
    /// pair. Training mode persists only the analytics counters and leaves
    /// the schedule untouched.
    pub async fn submit_review(
        &self,
        user_id: &Uuid,
        card_id: &Uuid,
        outcome: ReviewOutcome,
        mode: ReviewMode,
    ) -> anyhow::Result<MemoryState> {
        let card = self
            .cards
            .find_card(card_id)
            .await?
            .ok_or(CoreError::NotFound("card"))?;
        self.gate
            .require(user_id, &card.deck_id, AccessLevel::Student)
            .await?;

        let key = CardKey {
            user_id: *user_id,
            card_id: card.id,
            deck_id: card.deck_id,
        };
        let trace = self.states.latest(user_id, card_id).await?;
        let update = scheduler::update(&key, trace, outcome, mode, Utc::now())?;

        self.states.append(&update.state).await?;
        if let Some(due) = &update.due {
            self.due.put(due).await?;
        }
        if update.lapsed {
            self.audit
                .notify(AuditEvent::Lapse {
                    user_id: *user_id,
                    card_id: *card_id,
                })
                .await;
        }

        debug!(
            card = %card_id,
            repetition = update.state.repetition,
            interval = update.state.interval_days,
            "review applied"
        );
        Ok(update.state)
    }

    /// Validate a free-text response and apply it as a binary review.
    /// `training` selects practice mode, which never moves the schedule.
    pub async fn submit_answer(
        &self,
        user_id: &Uuid,
        card_id: &Uuid,
        response: &str,
        training: bool,
    ) -> anyhow::Result<(AnswerCheck, MemoryState)> {
        let card = self
            .cards
            .find_card(card_id)
            .await?
            .ok_or(CoreError::NotFound("card"))?;
        let check = AnswerCheck::from_bool(card.accepts(response));

        let mode = if training {
            ReviewMode::Training
        } else {
            ReviewMode::Normal
        };
        let state = self
            .submit_review(user_id, card_id, ReviewOutcome::Binary(check.correct), mode)
            .await?;
        Ok((check, state))
    }

    /// The deck-grouped "due today" batch.
    pub async fn fetch_today(&self, user_id: &Uuid) -> anyhow::Result<TodayBatch> {
        let records = self.queue.select_due(user_id, Utc::now()).await?;
        self.assembler.assemble_today(records).await
    }

    /// The shuffled training set for one deck.
    pub async fn fetch_training(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> anyhow::Result<Vec<ReviewCard>> {
        let records = self.queue.select_training(user_id, deck_id).await?;
        self.assembler.assemble_training(records).await
    }

    /// Subscribe a user to a public deck: Student grant plus one due-now
    /// record per card. Record creation is idempotent on (user, card), so
    /// re-running after a partial failure is safe. Returns the number of
    /// records created.
    pub async fn subscribe(&self, user_id: &Uuid, deck_id: &Uuid) -> anyhow::Result<usize> {
        let deck = self
            .cards
            .find_deck(deck_id)
            .await?
            .ok_or(CoreError::NotFound("deck"))?;
        if deck.status != DeckStatus::Public {
            return Err(CoreError::PermissionDenied.into());
        }
        if self.gate.permission(user_id, deck_id).await >= AccessLevel::Student {
            return Err(
                CoreError::InvalidInput("user is already subscribed to this deck".to_string())
                    .into(),
            );
        }

        self.access
            .upsert_grant(&AccessGrant {
                user_id: *user_id,
                deck_id: *deck_id,
                level: AccessLevel::Student,
                include_in_daily_queue: true,
            })
            .await?;

        let created = self.populate_due_records(user_id, deck_id).await?;
        info!(deck = %deck_id, created, "subscription populated");
        Ok(created)
    }

    /// Fan due-record creation out to every subscriber of the card's deck,
    /// as happens when a card is added to a deck users already follow.
    pub async fn on_card_created(&self, card: &Card) -> anyhow::Result<usize> {
        let now = Utc::now();
        let mut created = 0;
        for user_id in self.access.subscribers(&card.deck_id).await? {
            let key = CardKey {
                user_id,
                card_id: card.id,
                deck_id: card.deck_id,
            };
            if self
                .due
                .create_if_absent(&DueRecord::due_now(&key, now))
                .await?
            {
                created += 1;
                self.audit
                    .notify(AuditEvent::RecordCreated {
                        user_id,
                        card_id: card.id,
                    })
                    .await;
            }
        }
        Ok(created)
    }

    /// Flip the per-user toggle that admits a deck into the daily queue.
    pub async fn set_daily_toggle(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
        enabled: bool,
    ) -> anyhow::Result<()> {
        let grant = self.gate.grant(user_id, deck_id).await;
        if grant.level < AccessLevel::Student {
            return Err(CoreError::PermissionDenied.into());
        }
        self.access
            .upsert_grant(&AccessGrant {
                include_in_daily_queue: enabled,
                ..grant
            })
            .await
    }

    async fn populate_due_records(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> anyhow::Result<usize> {
        let now = Utc::now();
        let mut created = 0;
        for card in self.cards.cards_in_deck(deck_id).await? {
            let key = CardKey {
                user_id: *user_id,
                card_id: card.id,
                deck_id: *deck_id,
            };
            if self
                .due
                .create_if_absent(&DueRecord::due_now(&key, now))
                .await?
            {
                created += 1;
                self.audit
                    .notify(AuditEvent::RecordCreated {
                        user_id: *user_id,
                        card_id: card.id,
                    })
                    .await;
            }
        }
        Ok(created)
    }
}
