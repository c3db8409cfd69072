//! Integration tests for the due-date queue and access gate.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::Fixture;
use mnemos_core::model::{AccessLevel, CardKind, DeckStatus, DueRecord};
use mnemos_core::repository::{AccessRepo, DueRecordRepo};
use mnemos_review::{day_cutoff, AccessGate, DueQueue};
use uuid::Uuid;

fn queue(fx: &Fixture) -> DueQueue {
    let gate = AccessGate::new(Arc::clone(&fx.access) as Arc<dyn AccessRepo>);
    DueQueue::new(Arc::clone(&fx.due) as Arc<dyn DueRecordRepo>, gate)
}

async fn seed_due(fx: &Fixture, user: Uuid, deck: Uuid, offset: Duration) -> DueRecord {
    let card = fx.add_card(deck, "q", "a", CardKind::FreeText);
    let record = DueRecord {
        user_id: user,
        card_id: card.id,
        deck_id: deck,
        next_date: Utc::now() + offset,
    };
    fx.due.put(&record).await.unwrap();
    record
}

#[test]
fn test_day_cutoff_is_next_utc_midnight() {
    let now = Utc::now();
    let cutoff = day_cutoff(now);
    assert!(cutoff > now);
    assert!(cutoff - now <= Duration::days(1));
    assert_eq!(cutoff.time(), chrono::NaiveTime::MIN);
}

/// Anything due before the next calendar day is in; tomorrow is out.
#[tokio::test]
async fn test_due_today_boundary() {
    let fx = Fixture::new();
    let user = Uuid::now_v7();
    let deck = fx.add_deck("boundary", DeckStatus::Public);
    fx.grant(user, deck.id, AccessLevel::Student, true).await;

    let overdue = seed_due(&fx, user, deck.id, Duration::days(-3)).await;
    let due_now = seed_due(&fx, user, deck.id, Duration::zero()).await;
    let tomorrow = seed_due(&fx, user, deck.id, Duration::days(1)).await;

    let selected = queue(&fx).select_due(&user, Utc::now()).await.unwrap();

    let ids: Vec<Uuid> = selected.iter().map(|r| r.card_id).collect();
    assert!(ids.contains(&overdue.card_id));
    assert!(ids.contains(&due_now.card_id));
    assert!(!ids.contains(&tomorrow.card_id));
    // Ascending by next_date.
    assert_eq!(ids[0], overdue.card_id);
}

/// The per-user toggle keeps a whole deck out of the daily queue even when
/// its records are overdue.
#[tokio::test]
async fn test_daily_toggle_excludes_deck() {
    let fx = Fixture::new();
    let user = Uuid::now_v7();
    let toggled_off = fx.add_deck("off", DeckStatus::Public);
    let toggled_on = fx.add_deck("on", DeckStatus::Public);
    fx.grant(user, toggled_off.id, AccessLevel::Student, false).await;
    fx.grant(user, toggled_on.id, AccessLevel::Student, true).await;

    seed_due(&fx, user, toggled_off.id, Duration::days(-1)).await;
    let visible = seed_due(&fx, user, toggled_on.id, Duration::days(-1)).await;

    let selected = queue(&fx).select_due(&user, Utc::now()).await.unwrap();

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].card_id, visible.card_id);
}

/// No grant resolves to None, and None denies review eligibility.
#[tokio::test]
async fn test_missing_grant_filters_records() {
    let fx = Fixture::new();
    let user = Uuid::now_v7();
    let deck = fx.add_deck("ungranted", DeckStatus::Public);
    seed_due(&fx, user, deck.id, Duration::days(-1)).await;

    let gate = AccessGate::new(Arc::clone(&fx.access) as Arc<dyn AccessRepo>);
    assert_eq!(gate.permission(&user, &deck.id).await, AccessLevel::None);

    let selected = queue(&fx).select_due(&user, Utc::now()).await.unwrap();
    assert!(selected.is_empty());
}

/// Training selection ignores due dates but still requires Student access.
#[tokio::test]
async fn test_training_selection_gated() {
    let fx = Fixture::new();
    let user = Uuid::now_v7();
    let deck = fx.add_deck("training", DeckStatus::Public);
    seed_due(&fx, user, deck.id, Duration::days(5)).await;
    seed_due(&fx, user, deck.id, Duration::days(-5)).await;

    // No grant yet: denied.
    assert!(queue(&fx).select_training(&user, &deck.id).await.is_err());

    fx.grant(user, deck.id, AccessLevel::Student, true).await;
    let selected = queue(&fx).select_training(&user, &deck.id).await.unwrap();
    assert_eq!(selected.len(), 2);
}
