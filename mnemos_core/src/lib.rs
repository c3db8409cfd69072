#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod model;
pub mod repository;
pub mod scheduler;

pub use error::CoreError;
pub use model::{
    AccessGrant, AccessLevel, Card, CardKey, CardKind, Deck, DeckStatus, DueRecord, MemoryState,
    MemoryTrace,
};
pub use repository::{AccessRepo, AuditEvent, AuditSink, CardRepo, DueRecordRepo, MemoryStateRepo};
pub use scheduler::{Quality, ReviewMode, ReviewOutcome, ScheduleUpdate};
