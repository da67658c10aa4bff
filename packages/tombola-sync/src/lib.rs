//! Client side of a tombola game: the backend contract, same-process
//! refresh hints, the per-game sync client and the operator control panel.

#![deny(clippy::wildcard_imports)]

pub mod api;
pub mod channel;
pub mod client;
pub mod config;
pub mod control;
pub mod error;
pub mod view;

pub use api::{GameApi, HttpGameApi};
pub use channel::{RefreshChannel, SignalReceiver, SyncSignal};
pub use client::{GameSyncClient, SyncHandle};
pub use config::SyncConfig;
pub use control::ControlPanel;
pub use error::SyncError;
pub use view::{BoardSummary, CardView, GameSnapshot, SnapshotSource, SyncState, SyncView};

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
