#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use time::OffsetDateTime;
use tokio::sync::Notify;
use tombola_core::protocol::{
    CalledNumber, CardPage, GameStatusDto, LastDraw, WinCheckResponse,
};
use tombola_core::{CardId, DomainError, DrawEngine, Game, GameId};
use tombola_sync::{GameApi, SyncConfig, SyncError};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub const GAME: GameId = 7;

pub fn config(poll: Duration) -> SyncConfig {
    SyncConfig::default().with_poll_interval(poll)
}

/// Holds status fetches until released.
#[derive(Default)]
pub struct Gate {
    armed: AtomicBool,
    pub entered: Notify,
    release: Notify,
}

impl Gate {
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Let the held fetch finish; later fetches pass straight through.
    pub fn open(&self) {
        self.armed.store(false, Ordering::SeqCst);
        self.release.notify_one();
    }

    async fn pass(&self) {
        if self.armed.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

/// In-memory backend with call counters and failure switches.
pub struct FakeApi {
    game: Mutex<Game>,
    draws: Mutex<Vec<CalledNumber>>,
    engine: DrawEngine<StdRng>,
    pub status_calls: AtomicUsize,
    pub numbers_calls: AtomicUsize,
    pub draw_calls: AtomicUsize,
    pub fail_status: AtomicBool,
    pub fail_numbers: AtomicBool,
    pub gate: Gate,
}

impl FakeApi {
    pub fn new(started: bool) -> Arc<Self> {
        let mut game = Game::new(GAME, "Sagra");
        if started {
            game.start().expect("fresh game starts");
        }
        Arc::new(Self {
            game: Mutex::new(game),
            draws: Mutex::new(Vec::new()),
            engine: DrawEngine::from_os_rng(),
            status_calls: AtomicUsize::new(0),
            numbers_calls: AtomicUsize::new(0),
            draw_calls: AtomicUsize::new(0),
            fail_status: AtomicBool::new(false),
            fail_numbers: AtomicBool::new(false),
            gate: Gate::default(),
        })
    }

    pub fn as_api(self: &Arc<Self>) -> Arc<dyn GameApi> {
        Arc::clone(self) as Arc<dyn GameApi>
    }

    /// Record a draw as if another operator had made it.
    pub fn record_draw(&self, number: i32) -> u8 {
        self.commit(number).expect("draw accepted")
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn draw_calls(&self) -> usize {
        self.draw_calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, status: bool, numbers: bool) {
        self.fail_status.store(status, Ordering::SeqCst);
        self.fail_numbers.store(numbers, Ordering::SeqCst);
    }

    fn commit(&self, number: i32) -> Result<u8, DomainError> {
        let mut game = self.game.lock();
        let outcome = self.engine.draw_manual(&game, number)?;
        *game = outcome.game;
        self.draws.lock().push(CalledNumber {
            number: outcome.number,
            drawn_at: OffsetDateTime::now_utc(),
        });
        Ok(outcome.number)
    }

    fn dto(game: &Game) -> GameStatusDto {
        let now = OffsetDateTime::now_utc();
        GameStatusDto {
            id: game.id(),
            name: game.name().to_string(),
            drawn_numbers: game.drawn_numbers().iter().map(|n| i32::from(*n)).collect(),
            last_draw: game.latest().map(|number| LastDraw { number }),
            started_at: game.is_started().then_some(now),
            ended_at: game.is_ended().then_some(now),
            is_active: game.is_active(),
            total_numbers_drawn: game.drawn_numbers().len(),
        }
    }
}

#[async_trait]
impl GameApi for FakeApi {
    async fn create_game(&self, _name: &str) -> Result<GameStatusDto, SyncError> {
        Ok(Self::dto(&self.game.lock()))
    }

    async fn start(&self, _game_id: GameId) -> Result<(), SyncError> {
        self.game.lock().start()?;
        Ok(())
    }

    async fn end(&self, _game_id: GameId) -> Result<(), SyncError> {
        self.game.lock().end()?;
        Ok(())
    }

    async fn draw_random(&self, _game_id: GameId) -> Result<u8, SyncError> {
        self.draw_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.game.lock().drawn_set().remaining().first().copied();
        match next {
            Some(n) => Ok(self.commit(i32::from(n))?),
            None => Err(DomainError::GameExhausted.into()),
        }
    }

    async fn draw_manual(&self, _game_id: GameId, number: i32) -> Result<u8, SyncError> {
        self.draw_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.commit(number)?)
    }

    async fn status(&self, _game_id: GameId) -> Result<GameStatusDto, SyncError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(SyncError::Fetch("HTTP 503 Service Unavailable".into()));
        }
        Ok(Self::dto(&self.game.lock()))
    }

    async fn called_numbers(&self, _game_id: GameId) -> Result<Vec<CalledNumber>, SyncError> {
        self.numbers_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_numbers.load(Ordering::SeqCst) {
            return Err(SyncError::Fetch("HTTP 503 Service Unavailable".into()));
        }
        Ok(self.draws.lock().iter().rev().copied().collect())
    }

    async fn cards(
        &self,
        _game_id: GameId,
        page: usize,
        limit: usize,
        _search: Option<&str>,
    ) -> Result<CardPage, SyncError> {
        Ok(CardPage {
            data: Vec::new(),
            total: 0,
            page,
            pages: 0,
            limit,
        })
    }

    async fn check_win(
        &self,
        _game_id: GameId,
        card_id: CardId,
    ) -> Result<WinCheckResponse, SyncError> {
        Err(DomainError::CardNotFound(card_id).into())
    }
}
