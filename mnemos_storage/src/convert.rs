//! Model ↔ domain conversions.
//!
//! String-encoded enum columns fall back to their safe default on unknown
//! values (`AccessLevel::None`, `CardKind::FreeText`, `DeckStatus::Draft`)
//! rather than failing reads.

use chrono::{DateTime, Utc};
use mnemos_core::model::{AccessGrant, Card, Deck, DueRecord, MemoryState};
use mnemos_entities::{accesses, cards, decks, mem_dates, mems};
use sea_orm::Set;
use uuid::Uuid;

#[must_use]
pub fn state_from_model(m: mems::Model) -> MemoryState {
    MemoryState {
        user_id: m.user_id,
        card_id: m.card_id,
        deck_id: m.deck_id,
        easiness: m.easiness,
        repetition: u32::try_from(m.repetition).unwrap_or(0),
        interval_days: u32::try_from(m.interval_days).unwrap_or(0),
        total_reviews: u32::try_from(m.total_reviews).unwrap_or(0),
        total_errors: u32::try_from(m.total_errors).unwrap_or(0),
    }
}

#[must_use]
pub fn state_to_model(state: &MemoryState, now: DateTime<Utc>) -> mems::ActiveModel {
    mems::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(state.user_id),
        card_id: Set(state.card_id),
        deck_id: Set(state.deck_id),
        easiness: Set(state.easiness),
        repetition: Set(state.repetition as i32),
        interval_days: Set(state.interval_days as i32),
        total_reviews: Set(state.total_reviews as i32),
        total_errors: Set(state.total_errors as i32),
        created_at: Set(now.into()),
    }
}

#[must_use]
pub fn due_from_model(m: mem_dates::Model) -> DueRecord {
    DueRecord {
        user_id: m.user_id,
        card_id: m.card_id,
        deck_id: m.deck_id,
        next_date: m.next_date.into(),
    }
}

#[must_use]
pub fn grant_from_model(m: accesses::Model) -> AccessGrant {
    AccessGrant {
        user_id: m.user_id,
        deck_id: m.deck_id,
        level: m.level.parse().unwrap_or_default(),
        include_in_daily_queue: m.include_daily,
    }
}

#[must_use]
pub fn card_from_model(m: cards::Model) -> Card {
    Card {
        id: m.id,
        deck_id: m.deck_id,
        question: m.question,
        answer: m.answer,
        kind: m.kind.parse().unwrap_or_default(),
    }
}

#[must_use]
pub fn deck_from_model(m: decks::Model) -> Deck {
    Deck {
        id: m.id,
        name: m.name,
        description: m.description,
        status: m.status.parse().unwrap_or_default(),
    }
}
