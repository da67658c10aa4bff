//! Game storage with per-game serialization of mutations.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tombola_core::protocol::{CalledNumber, GameStatusDto, LastDraw};
use tombola_core::{DomainError, Game, GameId};

/// A stored game plus the bookkeeping the wire protocol reports.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub game: Game,
    pub created_at: OffsetDateTime,
    pub started_at: Option<OffsetDateTime>,
    pub ended_at: Option<OffsetDateTime>,
    /// Draw order, oldest first; mirrors `game.drawn_numbers()`.
    pub draws: Vec<CalledNumber>,
}

impl GameRecord {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            created_at: OffsetDateTime::now_utc(),
            started_at: None,
            ended_at: None,
            draws: Vec::new(),
        }
    }

    pub fn status(&self) -> GameStatusDto {
        let drawn: Vec<i32> = self
            .game
            .drawn_numbers()
            .iter()
            .map(|n| i32::from(*n))
            .collect();
        GameStatusDto {
            id: self.game.id(),
            name: self.game.name().to_string(),
            total_numbers_drawn: drawn.len(),
            drawn_numbers: drawn,
            last_draw: self.game.latest().map(|number| LastDraw { number }),
            started_at: self.started_at,
            ended_at: self.ended_at,
            is_active: self.game.is_active(),
        }
    }

    /// Called numbers, most recent first.
    pub fn called_numbers_desc(&self) -> Vec<CalledNumber> {
        self.draws.iter().rev().copied().collect()
    }
}

pub struct GameStore {
    next_id: AtomicI64,
    games: DashMap<GameId, Arc<Mutex<GameRecord>>>,
}

impl GameStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            games: DashMap::new(),
        }
    }

    /// Store a fresh, unstarted game under the next id.
    pub fn create(&self, name: &str) -> GameRecord {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = GameRecord::new(Game::new(id, name));
        self.games.insert(id, Arc::new(Mutex::new(record.clone())));
        record
    }

    /// Store an already built record, e.g. from a seed file.
    pub fn insert(&self, record: GameRecord) {
        let id = record.game.id();
        self.next_id.fetch_max(id.saturating_add(1), Ordering::Relaxed);
        self.games.insert(id, Arc::new(Mutex::new(record)));
    }

    pub fn exists(&self, id: GameId) -> bool {
        self.games.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Snapshot of one game.
    pub async fn get(&self, id: GameId) -> Result<GameRecord, DomainError> {
        let slot = self.slot(id)?;
        let record = slot.lock().await;
        Ok(record.clone())
    }

    /// Snapshots of every game, ordered by id.
    pub async fn all(&self) -> Vec<GameRecord> {
        let slots: Vec<Arc<Mutex<GameRecord>>> =
            self.games.iter().map(|e| e.value().clone()).collect();
        let mut records = Vec::with_capacity(slots.len());
        for slot in slots {
            records.push(slot.lock().await.clone());
        }
        records.sort_by_key(|r| r.game.id());
        records
    }

    /// Apply `f` to one game while holding its lock.
    ///
    /// Concurrent updates of the same game run one after the other, so each
    /// closure sees the state committed by the previous one. On `Err` the
    /// closure must leave the record untouched.
    pub async fn update<T, F>(&self, id: GameId, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut GameRecord) -> Result<T, DomainError>,
    {
        let slot = self.slot(id)?;
        let mut record = slot.lock().await;
        f(&mut record)
    }

    // Clone the Arc out so no map guard is held across an await.
    fn slot(&self, id: GameId) -> Result<Arc<Mutex<GameRecord>>, DomainError> {
        self.games
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(DomainError::GameNotFound(id))
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}
