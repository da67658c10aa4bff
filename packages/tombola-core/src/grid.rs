//! Placement of a card's 15 numbers on the printed 3x9 grid.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

use crate::card::card_rows;
use crate::errors::{CardDefect, DomainError};
use crate::numbers::DrawnSet;
use crate::rules::{column_for, COLUMNS, ROWS};

/// Printed layout of a card: three rows of nine cells, five filled per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: [[Option<u8>; COLUMNS]; ROWS],
}

impl Grid {
    pub fn rows(&self) -> &[[Option<u8>; COLUMNS]; ROWS] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<u8> {
        self.rows.get(row)?.get(column).copied().flatten()
    }

    pub fn filled(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Text rendering with drawn numbers marked by `*`.
    pub fn render(&self, drawn: &DrawnSet) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(n) if drawn.contains(i32::from(*n)) => format!("{n:>2}*"),
                    Some(n) => format!("{n:>2} "),
                    None => " . ".to_string(),
                })
                .collect();
            out.push('|');
            out.push_str(&cells.join("|"));
            out.push_str("|\n");
        }
        out
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.render(&DrawnSet::new()))
    }
}

/// Map a flat 15-number card onto the 3x9 grid.
///
/// Row comes from the input partition, column from the decade bucket. Fails
/// with `MalformedCard` and no partial grid when the cells are not 15
/// distinct numbers in 1..=90, or when two numbers of one row share a column.
pub fn map_to_grid(cells: &[i32]) -> Result<Grid, DomainError> {
    let logical = card_rows(cells)?;

    let mut rows = [[None; COLUMNS]; ROWS];
    for (row_idx, row) in logical.iter().enumerate() {
        for &n in row {
            let column = column_for(n);
            let slot = &mut rows[row_idx][column];
            if slot.is_some() {
                return Err(CardDefect::ColumnClash {
                    row: row_idx,
                    column,
                }
                .into());
            }
            *slot = Some(n);
        }
    }

    Ok(Grid { rows })
}
