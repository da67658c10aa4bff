//! Card storage, grouped by game.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;
use tombola_core::{Card, CardId, DomainError, GameId};

pub struct CardStore {
    next_id: AtomicI64,
    // ordered so pagination is stable
    cards: RwLock<BTreeMap<CardId, (GameId, Card)>>,
}

impl CardStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            cards: RwLock::new(BTreeMap::new()),
        }
    }

    /// Issue a card for a game. Cells are stored as given; shape problems
    /// surface when the card is displayed or checked.
    pub fn issue(&self, game_id: GameId, name: &str, cells: Vec<i32>) -> Card {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let card = Card::new(id, name, cells);
        self.cards.write().insert(id, (game_id, card.clone()));
        card
    }

    pub fn get(&self, id: CardId) -> Result<(GameId, Card), DomainError> {
        self.cards
            .read()
            .get(&id)
            .cloned()
            .ok_or(DomainError::CardNotFound(id))
    }

    /// Cards of one game matching `search`, in issue order.
    pub fn for_game(&self, game_id: GameId, search: &str) -> Vec<Card> {
        self.cards
            .read()
            .values()
            .filter(|(owner, card)| *owner == game_id && card.matches_search(search))
            .map(|(_, card)| card.clone())
            .collect()
    }
}

impl Default for CardStore {
    fn default() -> Self {
        Self::new()
    }
}
