//! Authoritative game state and its lifecycle.
//!
//! A game is created idle, started once, accumulates draws while started and
//! ends for good. The drawn sequence is append-only; only the draw engine
//! extends it.

use serde::Serialize;

use crate::errors::DomainError;
use crate::numbers::DrawnSet;
use crate::rules::{in_range, POUCH_SIZE};

pub type GameId = i64;

/// Result of a lifecycle call that is idempotent in its own direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    id: GameId,
    name: String,
    drawn_numbers: Vec<u8>,
    is_started: bool,
    is_ended: bool,
}

impl Game {
    /// New game, not yet started.
    pub fn new(id: GameId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            drawn_numbers: Vec::new(),
            is_started: false,
            is_ended: false,
        }
    }

    /// Rebuild a game from stored or transmitted parts, checking invariants.
    ///
    /// Rejects out-of-range or repeated numbers, and draws recorded on a game
    /// that was never started.
    pub fn from_parts(
        id: GameId,
        name: impl Into<String>,
        drawn_numbers: Vec<i32>,
        is_started: bool,
        is_ended: bool,
    ) -> Result<Self, DomainError> {
        if !drawn_numbers.is_empty() && !is_started {
            return Err(DomainError::GameNotActive);
        }

        let mut seen = DrawnSet::new();
        let mut numbers = Vec::with_capacity(drawn_numbers.len().min(POUCH_SIZE));
        for raw in drawn_numbers {
            if !in_range(raw) {
                return Err(DomainError::OutOfRange(raw));
            }
            if seen.contains(raw) {
                return Err(DomainError::DuplicateDraw(raw as u8));
            }
            seen.insert(raw);
            numbers.push(raw as u8);
        }

        Ok(Self {
            id,
            name: name.into(),
            drawn_numbers: numbers,
            is_started,
            is_ended: is_ended && is_started,
        })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drawn numbers in draw order; the last one is the latest.
    pub fn drawn_numbers(&self) -> &[u8] {
        &self.drawn_numbers
    }

    pub fn latest(&self) -> Option<u8> {
        self.drawn_numbers.last().copied()
    }

    pub fn drawn_set(&self) -> DrawnSet {
        self.drawn_numbers.iter().collect()
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }

    pub fn is_ended(&self) -> bool {
        self.is_ended
    }

    /// Started and not ended: the only state that accepts draws.
    pub fn is_active(&self) -> bool {
        self.is_started && !self.is_ended
    }

    pub fn remaining(&self) -> usize {
        POUCH_SIZE - self.drawn_numbers.len()
    }

    /// Start the game. A no-op when already running; an ended game
    /// cannot be restarted.
    pub fn start(&mut self) -> Result<Transition, DomainError> {
        if self.is_ended {
            return Err(DomainError::GameEnded);
        }
        if self.is_started {
            return Ok(Transition::Unchanged);
        }
        self.is_started = true;
        Ok(Transition::Applied)
    }

    /// End the game. A no-op when already ended; a game that never started
    /// cannot end.
    pub fn end(&mut self) -> Result<Transition, DomainError> {
        if !self.is_started {
            return Err(DomainError::GameNotActive);
        }
        if self.is_ended {
            return Ok(Transition::Unchanged);
        }
        self.is_ended = true;
        Ok(Transition::Applied)
    }

    pub(crate) fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(DomainError::GameNotActive)
        }
    }

    pub(crate) fn push_draw(&mut self, n: u8) {
        debug_assert!(!self.drawn_numbers.contains(&n));
        self.drawn_numbers.push(n);
    }
}
