//! Compact set of drawn numbers.

use crate::rules::{MAX_NUMBER, MIN_NUMBER};

/// Set of numbers in 1..=90 stored as a bitmask.
///
/// Values outside the pouch range are ignored on insert, so a set built from
/// arbitrary input can never match a card cell it should not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DrawnSet(u128);

impl DrawnSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, n: i32) {
        if let Some(bit) = Self::bit(n) {
            self.0 |= bit;
        }
    }

    pub fn contains(&self, n: i32) -> bool {
        Self::bit(n).is_some_and(|bit| self.0 & bit != 0)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Numbers still in the pouch, ascending.
    pub fn remaining(&self) -> Vec<u8> {
        (MIN_NUMBER..=MAX_NUMBER)
            .filter(|n| !self.contains(i32::from(*n)))
            .collect()
    }

    /// Keep only numbers also present in `other`.
    pub fn intersection(&self, other: &DrawnSet) -> DrawnSet {
        DrawnSet(self.0 & other.0)
    }

    fn bit(n: i32) -> Option<u128> {
        if (i32::from(MIN_NUMBER)..=i32::from(MAX_NUMBER)).contains(&n) {
            Some(1u128 << n)
        } else {
            None
        }
    }
}

impl FromIterator<i32> for DrawnSet {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        let mut set = DrawnSet::new();
        for n in iter {
            set.insert(n);
        }
        set
    }
}

impl FromIterator<u8> for DrawnSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        iter.into_iter().map(i32::from).collect()
    }
}

impl<'a> FromIterator<&'a u8> for DrawnSet {
    fn from_iter<I: IntoIterator<Item = &'a u8>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}
