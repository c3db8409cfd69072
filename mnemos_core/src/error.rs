//! Error taxonomy shared by the engine.
//!
//! Partial degradation (incomplete distractor pools) is deliberately absent:
//! it is recovered locally by the assembler and never surfaces as an error.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A referenced entity is absent. Absence of memory state on a first
    /// review is not an error; callers seed defaults instead.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed quality, outcome, or mode. Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The access gate resolved below the required level.
    #[error("permission denied")]
    PermissionDenied,

    /// Two reviews raced on the same (user, card) pair. The later writer
    /// fails fast instead of silently overwriting the streak counters.
    #[error("conflicting update: {0}")]
    Conflict(String),
}
