//! Boot-time seed data.
//!
//! A seed file is a JSON document with the games and cards to load into the
//! in-memory store:
//!
//! ```json
//! {
//!   "games": [{ "id": 1, "name": "Sagra", "drawnNumbers": [5, 12], "isStarted": true }],
//!   "cards": [{ "gameId": 1, "name": "Cartella 1", "cells": [5, 12, 24, 33, 41, 7, 18, 31, 52, 78, 1, 43, 55, 77, 89] }]
//! }
//! ```
//!
//! Games are checked against the domain invariants. Card cells are stored
//! as given, so a malformed card shows up as such instead of failing boot.

use std::path::Path;

use serde::Deserialize;
use time::OffsetDateTime;
use tombola_core::protocol::CalledNumber;
use tombola_core::{Game, GameId};
use tracing::info;

use crate::error::AppError;
use crate::repos::GameRecord;
use crate::state::app_state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub games: Vec<SeedGame>,
    #[serde(default)]
    pub cards: Vec<SeedCard>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedGame {
    pub id: GameId,
    pub name: String,
    #[serde(default)]
    pub drawn_numbers: Vec<i32>,
    #[serde(default)]
    pub is_started: bool,
    #[serde(default)]
    pub is_ended: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedCard {
    pub game_id: GameId,
    pub name: String,
    pub cells: Vec<i32>,
}

impl SeedFile {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::config(format!("invalid seed file {}: {e}", path.display()))
        })
    }

    /// Load everything into the state's stores. Fails on the first game that
    /// breaks an invariant or card that names an unknown game.
    pub fn apply(self, state: &AppState) -> Result<(), AppError> {
        let games = state.games.store();
        let now = OffsetDateTime::now_utc();
        let game_count = self.games.len();
        let card_count = self.cards.len();

        for seed in self.games {
            if !(1..GameId::MAX).contains(&seed.id) {
                return Err(AppError::config(format!(
                    "seed game id {} is outside 1..{}",
                    seed.id,
                    GameId::MAX
                )));
            }
            let game = Game::from_parts(
                seed.id,
                seed.name,
                seed.drawn_numbers,
                seed.is_started,
                seed.is_ended,
            )
            .map_err(|e| AppError::config(format!("seed game {}: {e}", seed.id)))?;

            let mut record = GameRecord::new(game);
            record.started_at = record.game.is_started().then_some(now);
            record.ended_at = record.game.is_ended().then_some(now);
            record.draws = record
                .game
                .drawn_numbers()
                .iter()
                .map(|&number| CalledNumber {
                    number,
                    drawn_at: now,
                })
                .collect();
            games.insert(record);
        }

        for seed in self.cards {
            state
                .cards
                .issue(seed.game_id, &seed.name, seed.cells)
                .map_err(|e| AppError::config(format!("seed card {:?}: {e}", seed.name)))?;
        }

        info!(games = game_count, cards = card_count, "seed data loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tombola_core::DrawEngine;

    use super::*;
    use crate::services::cards::PageQuery;

    fn empty() -> AppState {
        AppState::new(DrawEngine::from_os_rng())
    }

    const SEED: &str = r#"{
        "games": [
            { "id": 3, "name": "Sagra", "drawnNumbers": [5, 12], "isStarted": true },
            { "id": 7, "name": "Natale" }
        ],
        "cards": [
            { "gameId": 3, "name": "Prima", "cells": [5, 12, 24, 33, 41, 7, 18, 31, 52, 78, 1, 43, 55, 77, 89] },
            { "gameId": 3, "name": "Rotta", "cells": [1, 2] }
        ]
    }"#;

    #[tokio::test]
    async fn loads_games_and_cards_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let state = empty();
        SeedFile::load(file.path()).unwrap().apply(&state).unwrap();
        let games = state.games.store();

        let sagra = games.get(3).await.unwrap();
        assert_eq!(sagra.game.drawn_numbers(), &[5, 12]);
        assert!(sagra.started_at.is_some());
        assert_eq!(sagra.called_numbers_desc()[0].number, 12);
        let cards = state.cards.page(3, &PageQuery::default()).unwrap();
        assert_eq!(cards.total, 2);
        // ids continue after the highest seeded game
        assert_eq!(games.create("nuova").game.id(), 8);
    }

    #[test]
    fn rejects_draws_on_unstarted_game() {
        let seed: SeedFile = serde_json::from_str(
            r#"{ "games": [{ "id": 1, "name": "x", "drawnNumbers": [4] }] }"#,
        )
        .unwrap();
        let err = seed
            .apply(&empty())
            .unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn rejects_ids_the_store_cannot_follow() {
        for id in [0, -1, GameId::MAX] {
            let seed = SeedFile {
                games: vec![SeedGame {
                    id,
                    name: "x".into(),
                    drawn_numbers: vec![],
                    is_started: false,
                    is_ended: false,
                }],
                cards: vec![],
            };
            let err = seed.apply(&empty()).unwrap_err();
            assert!(err.detail().contains("outside"), "{id}: {err}");
        }
    }

    #[test]
    fn rejects_cards_for_unknown_games() {
        let seed: SeedFile = serde_json::from_str(
            r#"{ "cards": [{ "gameId": 9, "name": "x", "cells": [] }] }"#,
        )
        .unwrap();
        let err = seed.apply(&empty()).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
