//! Error handling for the Tombola backend.

pub mod domain;
pub mod error_code;

pub use error_code::ErrorCode;
