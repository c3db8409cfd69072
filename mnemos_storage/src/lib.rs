//! Database-backed implementations of the engine's repository contracts.
//!
//! Each repository holds a `DatabaseConnection` and translates between
//! sea-orm models and domain types through [`convert`]. The legacy
//! `easiness == 0` sentinel lives only here; it is lifted to
//! `MemoryTrace::Fresh` before the scheduler ever sees it.

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
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

pub mod audit;
pub mod convert;
pub mod repos;

pub use audit::TracingAuditSink;
pub use repos::{DatabaseAccessRepo, DatabaseCardRepo, DatabaseDueRepo, DatabaseStateRepo};

use sea_orm::{Database, DatabaseConnection};
use tracing::info;

/// Open the shared database connection used by all repositories.
pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    info!("Connecting to review database");
    let db = Database::connect(database_url).await?;
    info!("Review database connection established");
    Ok(db)
}
