//! Domain-level error type shared by the engine, the server and the client.
//!
//! This error type is HTTP-agnostic. The backend maps each variant onto an
//! error code and status; the sync client maps those codes back onto the
//! same variants so operators see identical rejections on both sides.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

use crate::card::CardId;
use crate::game::GameId;
use crate::rules::in_range;

/// Stable wire codes for domain rejections.
///
/// The backend emits these in the `code` member of error bodies; clients
/// match on them to rebuild the [`DomainError`].
pub mod codes {
    pub const MALFORMED_CARD: &str = "MALFORMED_CARD";
    pub const GAME_NOT_ACTIVE: &str = "GAME_NOT_ACTIVE";
    pub const GAME_ENDED: &str = "GAME_ENDED";
    pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";
    pub const DUPLICATE_DRAW: &str = "DUPLICATE_DRAW";
    pub const GAME_EXHAUSTED: &str = "GAME_EXHAUSTED";
    pub const GAME_NOT_FOUND: &str = "GAME_NOT_FOUND";
    pub const CARD_NOT_FOUND: &str = "CARD_NOT_FOUND";
}

/// Why a card could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardDefect {
    /// Card does not carry exactly 15 numbers.
    WrongLength(usize),
    /// A cell holds a value outside 1..=90.
    OutOfRange(i32),
    /// The same number appears twice.
    Duplicate(u8),
    /// Two numbers of one row fall into the same decade column.
    ColumnClash { row: usize, column: usize },
}

impl Display for CardDefect {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CardDefect::WrongLength(len) => write!(f, "expected 15 numbers, got {len}"),
            CardDefect::OutOfRange(n) => write!(f, "number {n} is outside 1-90"),
            CardDefect::Duplicate(n) => write!(f, "number {n} appears more than once"),
            CardDefect::ColumnClash { row, column } => {
                write!(f, "row {row} has two numbers in column {column}")
            }
        }
    }
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("malformed card: {0}")]
    MalformedCard(CardDefect),
    #[error("game is not active")]
    GameNotActive,
    #[error("game has ended")]
    GameEnded,
    #[error("number {0} is out of range 1-90")]
    OutOfRange(i32),
    #[error("number {0} has already been drawn")]
    DuplicateDraw(u8),
    #[error("all 90 numbers have been drawn")]
    GameExhausted,
    #[error("game {0} not found")]
    GameNotFound(GameId),
    #[error("card {0} not found")]
    CardNotFound(CardId),
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::MalformedCard(_) => codes::MALFORMED_CARD,
            DomainError::GameNotActive => codes::GAME_NOT_ACTIVE,
            DomainError::GameEnded => codes::GAME_ENDED,
            DomainError::OutOfRange(_) => codes::OUT_OF_RANGE,
            DomainError::DuplicateDraw(_) => codes::DUPLICATE_DRAW,
            DomainError::GameExhausted => codes::GAME_EXHAUSTED,
            DomainError::GameNotFound(_) => codes::GAME_NOT_FOUND,
            DomainError::CardNotFound(_) => codes::CARD_NOT_FOUND,
        }
    }

    /// Rebuild a game-scoped rejection from its wire code.
    ///
    /// `number` is the value the caller asked to draw, when there was one.
    /// Card-scoped codes and unknown codes return `None`.
    pub fn from_game_code(code: &str, game_id: GameId, number: Option<i32>) -> Option<Self> {
        match code {
            codes::GAME_NOT_ACTIVE => Some(DomainError::GameNotActive),
            codes::GAME_ENDED => Some(DomainError::GameEnded),
            codes::GAME_EXHAUSTED => Some(DomainError::GameExhausted),
            codes::GAME_NOT_FOUND => Some(DomainError::GameNotFound(game_id)),
            codes::OUT_OF_RANGE => number.map(DomainError::OutOfRange),
            codes::DUPLICATE_DRAW => number
                .filter(|&n| in_range(n))
                .map(|n| DomainError::DuplicateDraw(n as u8)),
            _ => None,
        }
    }
}

impl From<CardDefect> for DomainError {
    fn from(defect: CardDefect) -> Self {
        DomainError::MalformedCard(defect)
    }
}
