//! Cards and the decks that own them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// How a card is answered during review.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CardKind {
    /// Free-text answer, checked against the stored answer string.
    #[default]
    FreeText = 0,
    /// Multiple choice: the correct answer plus up to three distractors.
    Mcq = 1,
}

impl CardKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FreeText => "free_text",
            Self::Mcq => "mcq",
        }
    }
}

impl FromStr for CardKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free_text" => Ok(Self::FreeText),
            "mcq" => Ok(Self::Mcq),
            _ => Err("unknown card kind"),
        }
    }
}

/// A single reviewable item. Belongs to exactly one deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub question: String,
    pub answer: String,
    pub kind: CardKind,
}

impl Card {
    /// Case- and whitespace-insensitive answer comparison.
    #[must_use]
    pub fn accepts(&self, response: &str) -> bool {
        response.trim().eq_ignore_ascii_case(self.answer.trim())
    }
}

/// Deck publication state. Only public decks are open for self-subscription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DeckStatus {
    #[default]
    Draft = 0,
    Private = 1,
    Public = 2,
}

impl DeckStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Private => "private",
            Self::Public => "public",
        }
    }
}

impl FromStr for DeckStatus {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "private" => Ok(Self::Private),
            "public" => Ok(Self::Public),
            _ => Err("unknown deck status"),
        }
    }
}

/// A collection of cards owned by one or more users through access grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: DeckStatus,
}
