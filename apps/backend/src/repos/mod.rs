//! In-memory storage for games and cards.
//!
//! Stands in for the persistence collaborator: the services only rely on
//! `update` committing one closure at a time per game.

pub mod cards;
pub mod games;

pub use cards::CardStore;
pub use games::{GameRecord, GameStore};
