//! Append-only memory-strength rows. The latest row per (user, card) is
//! authoritative; older rows are kept for audit. A row with `easiness == 0`
//! is the legacy "never reviewed" sentinel.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mems")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_id: Uuid,
    pub deck_id: Uuid,
    pub easiness: f64,
    pub repetition: i32,
    pub interval_days: i32,
    pub total_reviews: i32,
    pub total_errors: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
