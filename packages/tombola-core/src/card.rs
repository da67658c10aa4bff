//! Player cards: 15 numbers in three logical rows of five.

use serde::{Deserialize, Serialize};

use crate::errors::{CardDefect, DomainError};
use crate::numbers::DrawnSet;
use crate::rules::{in_range, CARD_SIZE, ROWS, ROW_LEN};

pub type CardId = i64;

/// A card as issued to a player.
///
/// `cells` keeps the raw values from import so a bad card can still be
/// listed and reported; every computation goes through [`Card::rows`] and
/// fails closed on a malformed card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub cells: Vec<i32>,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<String>, cells: Vec<i32>) -> Self {
        Self {
            id,
            name: name.into(),
            cells,
        }
    }

    /// The three logical rows, validated.
    pub fn rows(&self) -> Result<[[u8; ROW_LEN]; ROWS], DomainError> {
        card_rows(&self.cells)
    }

    /// True when the card name or any of its numbers matches `term`.
    ///
    /// Names match case-insensitively as substrings; a numeric term also
    /// matches cards that carry that exact number.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        if self.name.to_lowercase().contains(&term.to_lowercase()) {
            return true;
        }
        term.parse::<i32>()
            .map(|n| self.cells.contains(&n))
            .unwrap_or(false)
    }
}

/// Validate raw cells and split them into rows by index
/// (row = index div 5).
pub fn card_rows(cells: &[i32]) -> Result<[[u8; ROW_LEN]; ROWS], DomainError> {
    if cells.len() != CARD_SIZE {
        return Err(CardDefect::WrongLength(cells.len()).into());
    }

    let mut seen = DrawnSet::new();
    let mut rows = [[0u8; ROW_LEN]; ROWS];
    for (idx, &raw) in cells.iter().enumerate() {
        if !in_range(raw) {
            return Err(CardDefect::OutOfRange(raw).into());
        }
        // in range, so the cast is lossless
        let n = raw as u8;
        if seen.contains(raw) {
            return Err(CardDefect::Duplicate(n).into());
        }
        seen.insert(raw);
        rows[idx / ROW_LEN][idx % ROW_LEN] = n;
    }
    Ok(rows)
}
