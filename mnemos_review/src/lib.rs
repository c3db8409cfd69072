//! Review-session engine: due-date queue, access gate, batch assembler,
//! and the orchestrating review service.
//!
//! The only concurrent component is the assembler's fan-out over a bounded
//! set of shard tasks; everything else is plain async plumbing over the
//! repository contracts in `mnemos_core`.

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
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod assembler;
pub mod gate;
pub mod queue;
pub mod service;

pub use assembler::{Assembler, DeckBatch, ReviewCard, TodayBatch};
pub use gate::AccessGate;
pub use queue::{day_cutoff, DueQueue};
pub use service::{AnswerCheck, ReviewService};
