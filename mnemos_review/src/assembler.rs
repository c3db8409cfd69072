//! Fan-out/fan-in assembly of review batches.
//!
//! Input records are partitioned into contiguous shards, one tokio task per
//! shard resolves cards and distractor pools, results flow back through an
//! mpsc channel, and the orchestrator waits for every shard before draining.
//! A wait-all barrier, not a streaming pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use mnemos_core::model::{Card, CardKind, Deck, DueRecord};
use mnemos_core::repository::{AuditEvent, AuditSink, CardRepo};
use rand::seq::SliceRandom;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

/// Fixed shard count for large batches.
const MAX_SHARDS: usize = 10;

/// Below this input size a single shard avoids worker overhead.
const SHARD_THRESHOLD: usize = 10;

/// A due record joined with its card and, for multiple choice, its
/// candidate answers. An empty `answers` list means free-text style review,
/// including the degraded-MCQ fallback.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCard {
    pub due: DueRecord,
    pub card: Card,
    pub answers: Vec<String>,
}

/// One deck's slice of the today batch.
#[derive(Debug, Clone, Serialize)]
pub struct DeckBatch {
    pub deck: Deck,
    pub count: usize,
    pub cards: Vec<ReviewCard>,
}

/// The full "due today" response: deck groups ascending by review count,
/// so decks with the least work surface first.
#[derive(Debug, Clone, Serialize, Default)]
pub struct TodayBatch {
    pub decks: Vec<DeckBatch>,
    pub total: usize,
}

/// Builds review batches from filtered due records.
#[derive(Clone)]
pub struct Assembler {
    cards: Arc<dyn CardRepo>,
    audit: Arc<dyn AuditSink>,
}

impl Assembler {
    #[must_use]
    pub const fn new(cards: Arc<dyn CardRepo>, audit: Arc<dyn AuditSink>) -> Self {
        Self { cards, audit }
    }

    /// Assemble the deck-grouped "today" batch.
    pub async fn assemble_today(&self, records: Vec<DueRecord>) -> anyhow::Result<TodayBatch> {
        let resolved = self.fan_out(records).await;

        let mut by_deck: HashMap<Uuid, Vec<ReviewCard>> = HashMap::new();
        for card in resolved {
            by_deck.entry(card.due.deck_id).or_default().push(card);
        }

        let mut decks = Vec::with_capacity(by_deck.len());
        for (deck_id, cards) in by_deck {
            match self.cards.find_deck(&deck_id).await {
                Ok(Some(deck)) => decks.push(DeckBatch {
                    deck,
                    count: cards.len(),
                    cards,
                }),
                Ok(None) => {
                    warn!(deck = %deck_id, "deck vanished during assembly, dropping group");
                }
                Err(err) => {
                    warn!(deck = %deck_id, "deck lookup failed during assembly, dropping group: {err}");
                }
            }
        }
        decks.sort_by_key(|batch| batch.count);

        // Counted after grouping so dropped deck groups never inflate it.
        let total = decks.iter().map(|batch| batch.count).sum();

        Ok(TodayBatch { decks, total })
    }

    /// Assemble a single-deck training set, shuffled so practice order does
    /// not bias recall.
    pub async fn assemble_training(
        &self,
        records: Vec<DueRecord>,
    ) -> anyhow::Result<Vec<ReviewCard>> {
        let mut resolved = self.fan_out(records).await;
        resolved.shuffle(&mut rand::thread_rng());
        Ok(resolved)
    }

    /// Fan records out across shard tasks and collect every result.
    ///
    /// The contiguous shard partition covers the input exactly once; the
    /// last shard absorbs the remainder of a non-even division. Failures
    /// are isolated per record inside the shard, so one bad card never
    /// aborts the batch.
    async fn fan_out(&self, records: Vec<DueRecord>) -> Vec<ReviewCard> {
        let n = records.len();
        if n == 0 {
            return Vec::new();
        }

        let shards = if n < SHARD_THRESHOLD { 1 } else { MAX_SHARDS };
        let per_shard = n / shards;

        let (tx, mut rx) = mpsc::channel(n);
        let mut handles = Vec::with_capacity(shards);
        for i in 0..shards {
            let lo = i * per_shard;
            let hi = if i == shards - 1 { n } else { (i + 1) * per_shard };
            let shard = records[lo..hi].to_vec();

            let cards = Arc::clone(&self.cards);
            let audit = Arc::clone(&self.audit);
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                for due in shard {
                    if let Some(card) = resolve(cards.as_ref(), audit.as_ref(), due).await {
                        // Capacity equals the input size, so this never blocks.
                        let _ = tx.send(card).await;
                    }
                }
            }));
        }
        drop(tx);

        // Wait-all barrier before draining.
        for handle in handles {
            if let Err(err) = handle.await {
                warn!("assembly shard task failed: {err}");
            }
        }

        let mut out = Vec::with_capacity(n);
        while let Ok(card) = rx.try_recv() {
            out.push(card);
        }
        out
    }
}

/// Resolve one due record into a review card.
///
/// A missing card skips the record; an incomplete distractor pool degrades
/// the card to free-text style. Both are reported to the audit sink and
/// neither fails the batch.
async fn resolve(
    cards: &dyn CardRepo,
    audit: &dyn AuditSink,
    due: DueRecord,
) -> Option<ReviewCard> {
    let card = match cards.find_card(&due.card_id).await {
        Ok(Some(card)) => card,
        Ok(None) => {
            warn!(card = %due.card_id, "due record points at missing card, skipping");
            audit
                .notify(AuditEvent::AssemblyDegraded {
                    user_id: due.user_id,
                    card_id: due.card_id,
                })
                .await;
            return None;
        }
        Err(err) => {
            warn!(card = %due.card_id, "card lookup failed, skipping: {err}");
            audit
                .notify(AuditEvent::AssemblyDegraded {
                    user_id: due.user_id,
                    card_id: due.card_id,
                })
                .await;
            return None;
        }
    };

    let answers = if card.kind == CardKind::Mcq {
        match cards.distractors(&card.id).await {
            Ok(pool) => pool,
            Err(err) => {
                warn!(card = %card.id, "distractor fetch failed, degrading to free text: {err}");
                audit
                    .notify(AuditEvent::AssemblyDegraded {
                        user_id: due.user_id,
                        card_id: due.card_id,
                    })
                    .await;
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    Some(ReviewCard { due, card, answers })
}
