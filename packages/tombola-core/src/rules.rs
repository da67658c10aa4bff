//! Fixed dimensions of the Italian tombola.

/// Lowest number in the pouch.
pub const MIN_NUMBER: u8 = 1;

/// Highest number in the pouch.
pub const MAX_NUMBER: u8 = 90;

/// Total numbers a game can draw.
pub const POUCH_SIZE: usize = MAX_NUMBER as usize;

/// Numbers printed on one card.
pub const CARD_SIZE: usize = 15;

/// Logical rows on a card.
pub const ROWS: usize = 3;

/// Numbers per logical row.
pub const ROW_LEN: usize = 5;

/// Columns of the printed grid, one per decade bucket.
pub const COLUMNS: usize = 9;

/// True when `n` can come out of the pouch.
pub fn in_range(n: i32) -> bool {
    (i32::from(MIN_NUMBER)..=i32::from(MAX_NUMBER)).contains(&n)
}

/// Decade bucket (grid column) for a number in range.
///
/// 1..=10 land in column 0, 11..=20 in column 1, and so on; 81..=89 share
/// column 8 with 90, which is pinned there explicitly.
pub fn column_for(n: u8) -> usize {
    if n == MAX_NUMBER {
        COLUMNS - 1
    } else {
        usize::from((n - 1) / 10)
    }
}
