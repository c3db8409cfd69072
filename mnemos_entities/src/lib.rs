//! Sea-orm entity definitions for the review engine's tables.
//!
//! Enum-valued columns (access level, card kind, deck status) are stored as
//! strings and parsed back through the domain types' `FromStr` impls.

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
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod accesses;
pub mod answers;
pub mod cards;
pub mod decks;
pub mod mem_dates;
pub mod mems;
