//! Card listing and win checks.

use std::sync::Arc;

use serde::Deserialize;
use tombola_core::protocol::CardPage;
use tombola_core::{evaluate, Card, CardId, DomainError, GameId, WinResult};
use tracing::info;

use crate::repos::{CardStore, GameStore};

pub const DEFAULT_PAGE_LIMIT: usize = 10;
pub const MAX_PAGE_LIMIT: usize = 100;

/// Paging request as read from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct CardService {
    games: Arc<GameStore>,
    cards: Arc<CardStore>,
}

impl CardService {
    pub fn new(games: Arc<GameStore>, cards: Arc<CardStore>) -> Self {
        Self { games, cards }
    }

    pub fn issue(
        &self,
        game_id: GameId,
        name: &str,
        cells: Vec<i32>,
    ) -> Result<Card, DomainError> {
        if !self.games.exists(game_id) {
            return Err(DomainError::GameNotFound(game_id));
        }
        Ok(self.cards.issue(game_id, name, cells))
    }

    /// One page of a game's cards. Pages are 1-based; a page past the end
    /// is empty rather than an error.
    pub fn page(&self, game_id: GameId, query: &PageQuery) -> Result<CardPage, DomainError> {
        if !self.games.exists(game_id) {
            return Err(DomainError::GameNotFound(game_id));
        }

        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        let page = query.page.unwrap_or(1).max(1);
        let matching = self
            .cards
            .for_game(game_id, query.search.as_deref().unwrap_or(""));

        let total = matching.len();
        let data = matching
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(limit))
            .take(limit)
            .collect();

        Ok(CardPage {
            data,
            total,
            page,
            pages: total.div_ceil(limit),
            limit,
        })
    }

    /// Evaluate a card against its game's drawn numbers.
    pub async fn check_win(
        &self,
        game_id: GameId,
        card_id: CardId,
    ) -> Result<WinResult, DomainError> {
        let (owner, card) = self.cards.get(card_id)?;
        if owner != game_id {
            return Err(DomainError::CardNotFound(card_id));
        }

        let record = self.games.get(game_id).await?;
        let result = evaluate(&card.cells, &record.game.drawn_set())?;
        info!(
            game_id,
            card_id,
            level = result.level.value(),
            "win checked"
        );
        Ok(result)
    }
}
