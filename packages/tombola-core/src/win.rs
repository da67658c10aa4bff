//! Prize tier of a card against the numbers drawn so far.
//!
//! Tiers below Tombola are scoped to a single logical row. The grouping is
//! by input index (the same partition the grid uses for rows), never by
//! printed column.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::card::card_rows;
use crate::errors::DomainError;
use crate::numbers::DrawnSet;
use crate::rules::{CARD_SIZE, ROW_LEN};

/// Prize tier, numbered by how many numbers it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WinLevel {
    None,
    Ambo,
    Terno,
    Quaterna,
    Cinquina,
    Tombola,
}

impl WinLevel {
    /// Tier reached by a single row with `matched` numbers drawn.
    pub fn for_row(matched: u8) -> Self {
        match matched {
            0 | 1 => WinLevel::None,
            2 => WinLevel::Ambo,
            3 => WinLevel::Terno,
            4 => WinLevel::Quaterna,
            _ => WinLevel::Cinquina,
        }
    }

    pub fn value(self) -> u8 {
        match self {
            WinLevel::None => 0,
            WinLevel::Ambo => 2,
            WinLevel::Terno => 3,
            WinLevel::Quaterna => 4,
            WinLevel::Cinquina => 5,
            WinLevel::Tombola => 15,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WinLevel::None => "Nessuna vincita",
            WinLevel::Ambo => "Ambo",
            WinLevel::Terno => "Terno",
            WinLevel::Quaterna => "Quaterna",
            WinLevel::Cinquina => "Cinquina",
            WinLevel::Tombola => "Tombola",
        }
    }

    pub fn is_win(self) -> bool {
        self != WinLevel::None
    }
}

impl Display for WinLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl From<WinLevel> for u8 {
    fn from(level: WinLevel) -> Self {
        level.value()
    }
}

impl TryFrom<u8> for WinLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WinLevel::None),
            2 => Ok(WinLevel::Ambo),
            3 => Ok(WinLevel::Terno),
            4 => Ok(WinLevel::Quaterna),
            5 => Ok(WinLevel::Cinquina),
            15 => Ok(WinLevel::Tombola),
            other => Err(format!("invalid win level {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinResult {
    pub level: WinLevel,
    pub matched_on_best_row: u8,
    /// Diagnostic only; never decides `level`.
    pub total_matched: u8,
}

impl WinResult {
    /// Announcement shown after a win check.
    pub fn message(&self) -> String {
        match self.level {
            WinLevel::None => WinLevel::None.name().to_string(),
            WinLevel::Tombola => "TOMBOLA!".to_string(),
            level => format!(
                "{}! ({} numeri sulla riga migliore)",
                level.name(),
                self.matched_on_best_row
            ),
        }
    }
}

/// Compute the current win tier of `cells` against `drawn`.
///
/// Pure and deterministic. A malformed card yields `MalformedCard`, never a
/// guessed level.
pub fn evaluate(cells: &[i32], drawn: &DrawnSet) -> Result<WinResult, DomainError> {
    let rows = card_rows(cells)?;

    let row_matches = rows.map(|row| {
        row.iter()
            .filter(|n| drawn.contains(i32::from(**n)))
            .count() as u8
    });

    let matched_on_best_row = row_matches.iter().copied().max().unwrap_or(0);
    let total_matched: u8 = row_matches.iter().sum();

    let level = if row_matches.iter().all(|&m| usize::from(m) == ROW_LEN) {
        WinLevel::Tombola
    } else {
        WinLevel::for_row(matched_on_best_row)
    };

    debug_assert!(usize::from(total_matched) <= CARD_SIZE);

    Ok(WinResult {
        level,
        matched_on_best_row,
        total_matched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [i32; 15] = [5, 12, 24, 33, 41, 7, 18, 31, 52, 78, 1, 43, 55, 77, 89];

    fn drawn(numbers: &[i32]) -> DrawnSet {
        numbers.iter().copied().collect()
    }

    #[test]
    fn first_row_complete_is_cinquina() {
        let result = evaluate(&SAMPLE, &drawn(&[5, 12, 24, 33, 41])).unwrap();
        assert_eq!(result.level, WinLevel::Cinquina);
        assert_eq!(result.level.value(), 5);
        assert_eq!(result.matched_on_best_row, 5);
        assert_eq!(result.total_matched, 5);
    }

    #[test]
    fn full_card_is_tombola() {
        let result = evaluate(&SAMPLE, &drawn(&SAMPLE)).unwrap();
        assert_eq!(result.level, WinLevel::Tombola);
        assert_eq!(result.level.value(), 15);
        assert_eq!(result.total_matched, 15);
    }

    #[test]
    fn spread_matches_do_not_add_up_across_rows() {
        // one per row, plus a second in row 1: best row has 2
        let result = evaluate(&SAMPLE, &drawn(&[5, 7, 18, 1])).unwrap();
        assert_eq!(result.level, WinLevel::Ambo);
        assert_eq!(result.matched_on_best_row, 2);
        assert_eq!(result.total_matched, 4);
    }

    #[test]
    fn single_match_is_no_win() {
        let result = evaluate(&SAMPLE, &drawn(&[5, 7, 1, 90])).unwrap();
        assert_eq!(result.level, WinLevel::None);
        assert_eq!(result.matched_on_best_row, 1);
    }

    #[test]
    fn malformed_card_fails_closed() {
        assert!(matches!(
            evaluate(&SAMPLE[..10], &drawn(&SAMPLE)),
            Err(DomainError::MalformedCard(_))
        ));
    }

    #[test]
    fn serializes_level_as_number() {
        let result = evaluate(&SAMPLE, &drawn(&[5, 12, 24])).unwrap();
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["level"], 3);
        assert_eq!(json["matchedOnBestRow"], 3);

        let back: WinLevel = serde_json::from_str("15").unwrap();
        assert_eq!(back, WinLevel::Tombola);
        assert!(serde_json::from_str::<WinLevel>("1").is_err());
    }

    #[test]
    fn messages() {
        let result = evaluate(&SAMPLE, &drawn(&[5, 12, 24, 33])).unwrap();
        assert_eq!(result.message(), "Quaterna! (4 numeri sulla riga migliore)");
        let result = evaluate(&SAMPLE, &drawn(&SAMPLE)).unwrap();
        assert_eq!(result.message(), "TOMBOLA!");
        let result = evaluate(&SAMPLE, &DrawnSet::new()).unwrap();
        assert_eq!(result.message(), "Nessuna vincita");
    }
}
