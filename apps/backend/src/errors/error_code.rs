//! Error codes for the Tombola API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that appear
//! in HTTP responses. Domain rejections reuse the strings from
//! `tombola_core::errors::codes` so clients can decode them.

use core::fmt;

use tombola_core::errors::codes;
use tombola_core::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Draw and lifecycle rejections
    /// Game is not started, or already ended
    GameNotActive,
    /// Ended games cannot restart
    GameEnded,
    /// Number outside 1-90
    OutOfRange,
    /// Number already drawn in this game
    DuplicateDraw,
    /// All 90 numbers drawn
    GameExhausted,

    // Cards
    /// Card is not 15 distinct numbers in 1-90
    MalformedCard,

    // Resource Not Found
    GameNotFound,
    CardNotFound,

    // Request Validation
    /// Game id in the path is not a positive integer
    InvalidGameId,
    /// Body or query could not be parsed
    BadRequest,

    // System Errors
    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GameNotActive => codes::GAME_NOT_ACTIVE,
            Self::GameEnded => codes::GAME_ENDED,
            Self::OutOfRange => codes::OUT_OF_RANGE,
            Self::DuplicateDraw => codes::DUPLICATE_DRAW,
            Self::GameExhausted => codes::GAME_EXHAUSTED,
            Self::MalformedCard => codes::MALFORMED_CARD,
            Self::GameNotFound => codes::GAME_NOT_FOUND,
            Self::CardNotFound => codes::CARD_NOT_FOUND,
            Self::InvalidGameId => "INVALID_GAME_ID",
            Self::BadRequest => "BAD_REQUEST",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Short human title for problem-details bodies.
    pub const fn title(self) -> &'static str {
        match self {
            Self::GameNotActive => "Game Not Active",
            Self::GameEnded => "Game Ended",
            Self::OutOfRange => "Number Out Of Range",
            Self::DuplicateDraw => "Duplicate Draw",
            Self::GameExhausted => "Game Exhausted",
            Self::MalformedCard => "Malformed Card",
            Self::GameNotFound => "Game Not Found",
            Self::CardNotFound => "Card Not Found",
            Self::InvalidGameId => "Invalid Game Id",
            Self::BadRequest => "Bad Request",
            Self::Internal => "Internal Error",
            Self::ConfigError => "Configuration Error",
        }
    }

    /// Every code, for uniqueness checks.
    pub const ALL: [ErrorCode; 12] = [
        Self::GameNotActive,
        Self::GameEnded,
        Self::OutOfRange,
        Self::DuplicateDraw,
        Self::GameExhausted,
        Self::MalformedCard,
        Self::GameNotFound,
        Self::CardNotFound,
        Self::InvalidGameId,
        Self::BadRequest,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::MalformedCard(_) => Self::MalformedCard,
            DomainError::GameNotActive => Self::GameNotActive,
            DomainError::GameEnded => Self::GameEnded,
            DomainError::OutOfRange(_) => Self::OutOfRange,
            DomainError::DuplicateDraw(_) => Self::DuplicateDraw,
            DomainError::GameExhausted => Self::GameExhausted,
            DomainError::GameNotFound(_) => Self::GameNotFound,
            DomainError::CardNotFound(_) => Self::CardNotFound,
        }
    }
}
