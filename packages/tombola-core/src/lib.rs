//! Tombola domain layer: cards, grid placement, win tiers and draw rules.
//!
//! Everything in this crate is pure. Storage, transport and scheduling live
//! in the backend and sync crates, which share these types and the wire
//! protocol defined in [`protocol`].

#![deny(clippy::wildcard_imports)]

pub mod card;
pub mod draw;
pub mod errors;
pub mod game;
pub mod grid;
pub mod numbers;
pub mod protocol;
pub mod rules;
pub mod win;

pub use card::{Card, CardId};
pub use draw::{DrawEngine, DrawOutcome};
pub use errors::{CardDefect, DomainError};
pub use game::{Game, GameId, Transition};
pub use grid::{map_to_grid, Grid};
pub use numbers::DrawnSet;
pub use win::{evaluate, WinLevel, WinResult};
