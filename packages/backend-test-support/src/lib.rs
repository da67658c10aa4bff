//! Test support shared by the Tombola crates.
//!
//! Unified logging initialization for test binaries, plus assertions for
//! the server's problem-details error contract.

pub mod logging;
pub mod problem_details;
