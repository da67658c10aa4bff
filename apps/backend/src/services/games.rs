//! Game lifecycle and draw services.
//!
//! Every mutation goes through [`GameStore::update`], so start, end and the
//! two draw kinds for one game are applied one at a time. The draw engine
//! only proposes the next state; it is committed while the game lock is
//! still held.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use time::OffsetDateTime;
use tombola_core::protocol::{CalledNumber, GameStatusDto};
use tombola_core::{DomainError, DrawEngine, DrawOutcome, GameId, Transition};
use tracing::{debug, info};

use crate::repos::{GameRecord, GameStore};

/// Default size of the latest-numbers list.
pub const DEFAULT_LATEST_LIMIT: usize = 10;

#[derive(Clone)]
pub struct GameService {
    store: Arc<GameStore>,
    engine: Arc<Mutex<DrawEngine<StdRng>>>,
}

impl GameService {
    pub fn new(store: Arc<GameStore>, engine: DrawEngine<StdRng>) -> Self {
        Self {
            store,
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn store(&self) -> &Arc<GameStore> {
        &self.store
    }

    pub fn create(&self, name: &str) -> GameStatusDto {
        let record = self.store.create(name);
        info!(game_id = record.game.id(), name, "game created");
        record.status()
    }

    pub async fn start(&self, game_id: GameId) -> Result<Transition, DomainError> {
        let transition = self
            .store
            .update(game_id, |record| {
                let transition = record.game.start()?;
                if transition == Transition::Applied {
                    record.started_at = Some(OffsetDateTime::now_utc());
                }
                Ok(transition)
            })
            .await?;

        match transition {
            Transition::Applied => info!(game_id, "game started"),
            Transition::Unchanged => debug!(game_id, "game already started"),
        }
        Ok(transition)
    }

    pub async fn end(&self, game_id: GameId) -> Result<Transition, DomainError> {
        let transition = self
            .store
            .update(game_id, |record| {
                let transition = record.game.end()?;
                if transition == Transition::Applied {
                    record.ended_at = Some(OffsetDateTime::now_utc());
                }
                Ok(transition)
            })
            .await?;

        match transition {
            Transition::Applied => info!(game_id, "game ended"),
            Transition::Unchanged => debug!(game_id, "game already ended"),
        }
        Ok(transition)
    }

    /// Draw a random number still in the pouch.
    pub async fn draw_random(&self, game_id: GameId) -> Result<u8, DomainError> {
        let engine = Arc::clone(&self.engine);
        let number = self
            .store
            .update(game_id, move |record| {
                let outcome = engine.lock().draw_random(&record.game)?;
                Ok(commit(record, outcome))
            })
            .await?;

        info!(game_id, number, kind = "random", "number drawn");
        Ok(number)
    }

    /// Draw the number the operator called out.
    pub async fn draw_manual(&self, game_id: GameId, number: i32) -> Result<u8, DomainError> {
        let engine = Arc::clone(&self.engine);
        let number = self
            .store
            .update(game_id, move |record| {
                let outcome = engine.lock().draw_manual(&record.game, number)?;
                Ok(commit(record, outcome))
            })
            .await?;

        info!(game_id, number, kind = "manual", "number drawn");
        Ok(number)
    }

    pub async fn status(&self, game_id: GameId) -> Result<GameStatusDto, DomainError> {
        Ok(self.store.get(game_id).await?.status())
    }

    /// All called numbers, most recent first.
    pub async fn numbers_desc(&self, game_id: GameId) -> Result<Vec<CalledNumber>, DomainError> {
        Ok(self.store.get(game_id).await?.called_numbers_desc())
    }

    /// The `limit` most recent numbers, most recent first.
    pub async fn latest(
        &self,
        game_id: GameId,
        limit: usize,
    ) -> Result<Vec<CalledNumber>, DomainError> {
        let mut numbers = self.numbers_desc(game_id).await?;
        numbers.truncate(limit);
        Ok(numbers)
    }

    pub async fn list(&self) -> Vec<GameStatusDto> {
        self.store.all().await.iter().map(GameRecord::status).collect()
    }

    /// Games that are started and not ended.
    pub async fn active(&self) -> Vec<GameStatusDto> {
        self.store
            .all()
            .await
            .iter()
            .filter(|record| record.game.is_active())
            .map(GameRecord::status)
            .collect()
    }
}

fn commit(record: &mut GameRecord, outcome: DrawOutcome) -> u8 {
    let DrawOutcome { number, game } = outcome;
    record.game = game;
    record.draws.push(CalledNumber {
        number,
        drawn_at: OffsetDateTime::now_utc(),
    });
    number
}
