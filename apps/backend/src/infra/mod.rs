//! Infrastructure: state construction and boot-time seeding.

pub mod seed;
pub mod state;
