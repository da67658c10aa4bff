#![allow(dead_code)]

//! Generators shared by the property suites.
//!
//! Cards are valid by construction: each row picks five distinct decade
//! columns, and each column hands out distinct numbers of its decade to the
//! rows that use it. No filtering, so no rejected cases.

use std::env;

use proptest::prelude::*;
use proptest::sample::subsequence;
use tombola_core::rules::{COLUMNS, MAX_NUMBER, ROWS, ROW_LEN};

pub fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);

    ProptestConfig {
        cases,
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// All numbers of one decade column.
pub fn decade(column: usize) -> Vec<i32> {
    let start = column as i32 * 10 + 1;
    (start..start + 10).collect()
}

fn row_columns() -> impl Strategy<Value = Vec<usize>> {
    subsequence((0..COLUMNS).collect::<Vec<_>>(), ROW_LEN).prop_shuffle()
}

fn column_numbers() -> impl Strategy<Value = Vec<Vec<i32>>> {
    (0..COLUMNS)
        .map(|c| subsequence(decade(c), ROWS).prop_shuffle())
        .collect::<Vec<_>>()
}

/// Flat 15-number card, rows in index order.
pub fn valid_card() -> impl Strategy<Value = Vec<i32>> {
    ([row_columns(), row_columns(), row_columns()], column_numbers()).prop_map(
        |(rows, numbers)| {
            let mut cells = Vec::with_capacity(ROWS * ROW_LEN);
            for (r, columns) in rows.iter().enumerate() {
                for &c in columns {
                    cells.push(numbers[c][r]);
                }
            }
            cells
        },
    )
}

/// Any subset of the pouch, in random order.
pub fn drawn_numbers() -> impl Strategy<Value = Vec<i32>> {
    subsequence(
        (1..=i32::from(MAX_NUMBER)).collect::<Vec<_>>(),
        0..=usize::from(MAX_NUMBER),
    )
    .prop_shuffle()
}

/// Like [`drawn_numbers`] but never empty.
pub fn some_drawn_numbers() -> impl Strategy<Value = Vec<i32>> {
    subsequence(
        (1..=i32::from(MAX_NUMBER)).collect::<Vec<_>>(),
        1..=usize::from(MAX_NUMBER),
    )
    .prop_shuffle()
}
