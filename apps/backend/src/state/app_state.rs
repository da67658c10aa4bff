use std::sync::Arc;

use rand::rngs::StdRng;
use time::OffsetDateTime;
use tombola_core::DrawEngine;

use crate::repos::{CardStore, GameStore};
use crate::services::{CardService, GameService};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub games: GameService,
    pub cards: CardService,
    pub booted_at: OffsetDateTime,
}

impl AppState {
    /// Empty stores; random draws come from `engine`.
    pub fn new(engine: DrawEngine<StdRng>) -> Self {
        let games = Arc::new(GameStore::new());
        Self {
            games: GameService::new(Arc::clone(&games), engine),
            cards: CardService::new(games, Arc::new(CardStore::new())),
            booted_at: OffsetDateTime::now_utc(),
        }
    }
}
