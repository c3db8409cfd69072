//! In-memory repository fakes shared by the integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mnemos_core::model::{
    AccessGrant, AccessLevel, Card, CardKind, Deck, DeckStatus, DueRecord, MemoryState,
    MemoryTrace,
};
use mnemos_core::repository::{
    AccessRepo, AuditEvent, AuditSink, CardRepo, DueRecordRepo, MemoryStateRepo,
};
use mnemos_core::CoreError;
use mnemos_review::ReviewService;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStateRepo {
    rows: Mutex<Vec<MemoryState>>,
}

#[async_trait]
impl MemoryStateRepo for InMemoryStateRepo {
    async fn latest(&self, user_id: &Uuid, card_id: &Uuid) -> anyhow::Result<MemoryTrace> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .find(|s| s.user_id == *user_id && s.card_id == *card_id)
            .cloned()
            .map_or(MemoryTrace::Fresh, MemoryTrace::Established))
    }

    async fn append(&self, state: &MemoryState) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let stored = rows
            .iter()
            .rev()
            .find(|s| s.user_id == state.user_id && s.card_id == state.card_id)
            .map_or(0, |s| s.total_reviews);
        if state.total_reviews != stored + 1 {
            return Err(CoreError::Conflict("stale memory state write".to_string()).into());
        }
        rows.push(state.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryDueRepo {
    rows: Mutex<HashMap<(Uuid, Uuid), DueRecord>>,
}

impl InMemoryDueRepo {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl DueRecordRepo for InMemoryDueRepo {
    async fn create_if_absent(&self, record: &DueRecord) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let key = (record.user_id, record.card_id);
        if rows.contains_key(&key) {
            return Ok(false);
        }
        rows.insert(key, record.clone());
        Ok(true)
    }

    async fn find(&self, user_id: &Uuid, card_id: &Uuid) -> anyhow::Result<Option<DueRecord>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&(*user_id, *card_id))
            .cloned())
    }

    async fn put(&self, record: &DueRecord) -> anyhow::Result<()> {
        self.rows
            .lock()
            .unwrap()
            .insert((record.user_id, record.card_id), record.clone());
        Ok(())
    }

    async fn list_due_before(
        &self,
        user_id: &Uuid,
        cutoff: DateTime<Utc>,
    ) -> anyhow::Result<Vec<DueRecord>> {
        let rows = self.rows.lock().unwrap();
        let mut due: Vec<DueRecord> = rows
            .values()
            .filter(|r| r.user_id == *user_id && r.next_date < cutoff)
            .cloned()
            .collect();
        due.sort_by_key(|r| r.next_date);
        Ok(due)
    }

    async fn list_for_deck(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> anyhow::Result<Vec<DueRecord>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .filter(|r| r.user_id == *user_id && r.deck_id == *deck_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryAccessRepo {
    rows: Mutex<HashMap<(Uuid, Uuid), AccessGrant>>,
}

#[async_trait]
impl AccessRepo for InMemoryAccessRepo {
    async fn find_grant(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> anyhow::Result<Option<AccessGrant>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&(*user_id, *deck_id))
            .cloned())
    }

    async fn upsert_grant(&self, grant: &AccessGrant) -> anyhow::Result<()> {
        self.rows
            .lock()
            .unwrap()
            .insert((grant.user_id, grant.deck_id), grant.clone());
        Ok(())
    }

    async fn subscribers(&self, deck_id: &Uuid) -> anyhow::Result<Vec<Uuid>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.deck_id == *deck_id && g.level > AccessLevel::None)
            .map(|g| g.user_id)
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryCardRepo {
    cards: Mutex<HashMap<Uuid, Card>>,
    decks: Mutex<HashMap<Uuid, Deck>>,
    answers: Mutex<HashMap<Uuid, Vec<String>>>,
}

#[async_trait]
impl CardRepo for InMemoryCardRepo {
    async fn find_card(&self, card_id: &Uuid) -> anyhow::Result<Option<Card>> {
        Ok(self.cards.lock().unwrap().get(card_id).cloned())
    }

    async fn find_deck(&self, deck_id: &Uuid) -> anyhow::Result<Option<Deck>> {
        Ok(self.decks.lock().unwrap().get(deck_id).cloned())
    }

    async fn cards_in_deck(&self, deck_id: &Uuid) -> anyhow::Result<Vec<Card>> {
        Ok(self
            .cards
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.deck_id == *deck_id)
            .cloned()
            .collect())
    }

    async fn distractors(&self, card_id: &Uuid) -> anyhow::Result<Vec<String>> {
        let mut pool = self
            .answers
            .lock()
            .unwrap()
            .get(card_id)
            .cloned()
            .unwrap_or_default();
        pool.truncate(4);
        Ok(pool)
    }
}

#[derive(Default)]
pub struct RecordingAuditSink {
    pub events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn notify(&self, event: AuditEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// A wired-up service plus handles to its backing stores for seeding.
pub struct Fixture {
    pub service: ReviewService,
    pub states: Arc<InMemoryStateRepo>,
    pub due: Arc<InMemoryDueRepo>,
    pub access: Arc<InMemoryAccessRepo>,
    pub cards: Arc<InMemoryCardRepo>,
    pub audit: Arc<RecordingAuditSink>,
}

impl Fixture {
    pub fn new() -> Self {
        let states = Arc::new(InMemoryStateRepo::default());
        let due = Arc::new(InMemoryDueRepo::default());
        let access = Arc::new(InMemoryAccessRepo::default());
        let cards = Arc::new(InMemoryCardRepo::default());
        let audit = Arc::new(RecordingAuditSink::default());
        let service = ReviewService::new(
            Arc::clone(&states) as Arc<dyn MemoryStateRepo>,
            Arc::clone(&due) as Arc<dyn DueRecordRepo>,
            Arc::clone(&access) as Arc<dyn AccessRepo>,
            Arc::clone(&cards) as Arc<dyn CardRepo>,
            Arc::clone(&audit) as Arc<dyn AuditSink>,
        );
        Self {
            service,
            states,
            due,
            access,
            cards,
            audit,
        }
    }

    pub fn add_deck(&self, name: &str, status: DeckStatus) -> Deck {
        let deck = Deck {
            id: Uuid::now_v7(),
            name: name.to_string(),
            description: String::new(),
            status,
        };
        self.cards
            .decks
            .lock()
            .unwrap()
            .insert(deck.id, deck.clone());
        deck
    }

    pub fn add_card(&self, deck_id: Uuid, question: &str, answer: &str, kind: CardKind) -> Card {
        let card = Card {
            id: Uuid::now_v7(),
            deck_id,
            question: question.to_string(),
            answer: answer.to_string(),
            kind,
        };
        self.cards
            .cards
            .lock()
            .unwrap()
            .insert(card.id, card.clone());
        card
    }

    pub fn add_answers(&self, card_id: Uuid, pool: &[&str]) {
        self.cards
            .answers
            .lock()
            .unwrap()
            .insert(card_id, pool.iter().map(ToString::to_string).collect());
    }

    pub async fn grant(&self, user_id: Uuid, deck_id: Uuid, level: AccessLevel, daily: bool) {
        self.access
            .upsert_grant(&AccessGrant {
                user_id,
                deck_id,
                level,
                include_in_daily_queue: daily,
            })
            .await
            .unwrap();
    }
}
