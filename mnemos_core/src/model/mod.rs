mod access;
mod card;
mod memory;

pub use access::{AccessGrant, AccessLevel};
pub use card::{Card, CardKind, Deck, DeckStatus};
pub use memory::{CardKey, DueRecord, MemoryState, MemoryTrace};
