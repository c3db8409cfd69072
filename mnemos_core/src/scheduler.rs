//! Spaced-repetition scheduling.
//!
//! Pure functions from (previous state, review outcome) to (new state, new
//! due date). No I/O and no clock access; callers pass `now` in, persistence
//! happens above this layer.
//!
//! Interval policy: 1 day for the first repetition, 6 days for the second,
//! then `previous_interval * easiness` rounded half-away-from-zero with a
//! 1-day minimum. All dates are UTC.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{CardKey, DueRecord, MemoryState, MemoryTrace};

/// Easiness factor seeded for a card with no review history.
pub const DEFAULT_EASINESS: f64 = 2.5;

/// Floor below which the easiness factor is never allowed to fall.
pub const MIN_EASINESS: f64 = 1.3;

/// Graded review quality on the 0..=5 ordinal scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8")]
pub struct Quality(u8);

impl TryFrom<u8> for Quality {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Quality {
    /// Quality below which a review counts as a lapse.
    pub const LAPSE_THRESHOLD: u8 = 3;

    pub fn new(value: u8) -> Result<Self, CoreError> {
        if value > 5 {
            return Err(CoreError::InvalidInput(format!(
                "quality must be in 0..=5, got {value}"
            )));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_lapse(self) -> bool {
        self.0 < Self::LAPSE_THRESHOLD
    }
}

/// Outcome of a single review.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ReviewOutcome {
    /// Correct/incorrect, as produced by answer validation.
    Binary(bool),
    /// Self-evaluated quality on the 0..=5 scale.
    Graded(Quality),
}

/// How a review affects the persisted schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
    /// Binary outcome, full schedule update.
    Normal,
    /// Binary outcome, schedule untouched; only analytics counters move.
    Training,
    /// Graded outcome, classic SM-2 easiness recurrence.
    SelfEvaluated,
}

/// Result of one scheduling update.
#[derive(Debug, Clone)]
pub struct ScheduleUpdate {
    pub state: MemoryState,
    /// `None` means the persisted schedule must not be touched (training).
    pub due: Option<DueRecord>,
    /// True when the outcome reset the repetition streak.
    pub lapsed: bool,
}

/// Compute the next memory state and due date for a review.
///
/// A `Fresh` trace is seeded with defaults (`easiness = 2.5`,
/// `repetition = 0`) before the update. Fails only on malformed input:
/// a graded outcome in a binary mode or vice versa.
pub fn update(
    key: &CardKey,
    trace: MemoryTrace,
    outcome: ReviewOutcome,
    mode: ReviewMode,
    now: DateTime<Utc>,
) -> Result<ScheduleUpdate, CoreError> {
    let mut state = seed(key, trace);

    match (mode, outcome) {
        (ReviewMode::Normal, ReviewOutcome::Binary(correct)) => {
            let lapsed = !correct;
            if correct {
                advance(&mut state, 0.1);
            } else {
                lapse(&mut state, 0.2);
            }
            state.total_reviews += 1;
            Ok(ScheduleUpdate {
                due: Some(scheduled(key, &state, now)),
                lapsed,
                state,
            })
        }
        (ReviewMode::Training, ReviewOutcome::Binary(correct)) => {
            // Practice only: repetition, easiness, and interval stay put.
            state.total_reviews += 1;
            if !correct {
                state.total_errors += 1;
            }
            Ok(ScheduleUpdate {
                state,
                due: None,
                lapsed: false,
            })
        }
        (ReviewMode::SelfEvaluated, ReviewOutcome::Graded(quality)) => {
            state.easiness = sm2_easiness(state.easiness, quality);
            let lapsed = quality.is_lapse();
            if lapsed {
                // The interval collapses regardless of the computed easiness.
                state.repetition = 0;
                state.interval_days = 1;
                state.total_errors += 1;
            } else {
                state.repetition += 1;
                state.interval_days = next_interval(&state);
            }
            state.total_reviews += 1;
            Ok(ScheduleUpdate {
                due: Some(scheduled(key, &state, now)),
                lapsed,
                state,
            })
        }
        (ReviewMode::SelfEvaluated, ReviewOutcome::Binary(_)) => Err(CoreError::InvalidInput(
            "self-evaluated review requires a graded quality".to_string(),
        )),
        (ReviewMode::Normal | ReviewMode::Training, ReviewOutcome::Graded(_)) => {
            Err(CoreError::InvalidInput(
                "binary review mode cannot take a graded quality".to_string(),
            ))
        }
    }
}

fn seed(key: &CardKey, trace: MemoryTrace) -> MemoryState {
    match trace {
        MemoryTrace::Established(state) => state,
        MemoryTrace::Fresh => MemoryState {
            user_id: key.user_id,
            card_id: key.card_id,
            deck_id: key.deck_id,
            easiness: DEFAULT_EASINESS,
            repetition: 0,
            interval_days: 0,
            total_reviews: 0,
            total_errors: 0,
        },
    }
}

fn advance(state: &mut MemoryState, nudge: f64) {
    state.easiness += nudge;
    state.repetition += 1;
    state.interval_days = next_interval(state);
}

fn lapse(state: &mut MemoryState, penalty: f64) {
    state.easiness = (state.easiness - penalty).max(MIN_EASINESS);
    state.repetition = 0;
    state.interval_days = 1;
    state.total_errors += 1;
}

/// SM-2 recurrence: `E' = E + (0.1 - (5-q)(0.08 + (5-q) * 0.02))`, floored.
fn sm2_easiness(easiness: f64, quality: Quality) -> f64 {
    let q = f64::from(quality.value());
    let next = easiness + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    next.max(MIN_EASINESS)
}

/// Interval table: 1 day, 6 days, then grow by the (updated) easiness.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn next_interval(state: &MemoryState) -> u32 {
    match state.repetition {
        0 | 1 => 1,
        2 => 6,
        _ => (f64::from(state.interval_days) * state.easiness)
            .round()
            .max(1.0) as u32,
    }
}

fn scheduled(key: &CardKey, state: &MemoryState, now: DateTime<Utc>) -> DueRecord {
    DueRecord {
        user_id: key.user_id,
        card_id: key.card_id,
        deck_id: key.deck_id,
        next_date: now + Duration::days(i64::from(state.interval_days)),
    }
}
