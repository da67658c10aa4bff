//! Same-process refresh hints.
//!
//! Every viewer of a game subscribes to the slot `gameRefreshKey_{gameId}`.
//! A successful operator action writes a [`SyncSignal`] there and every
//! subscriber refreshes right away. A signal carries no game data and may be
//! missed; the refresh timer still brings every viewer up to date.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::watch;
use tombola_core::GameId;
use tracing::trace;

/// "Something changed for this game, re-fetch."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSignal {
    pub game_id: GameId,
    /// Unix milliseconds at which the change was confirmed.
    pub timestamp: i64,
}

impl SyncSignal {
    pub fn now(game_id: GameId) -> Self {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        Self {
            game_id,
            timestamp: i64::try_from(millis).unwrap_or(i64::MAX),
        }
    }

    /// Channel slot for a game.
    pub fn key(game_id: GameId) -> String {
        format!("gameRefreshKey_{game_id}")
    }
}

pub type SignalReceiver = watch::Receiver<Option<SyncSignal>>;

/// Keyed broadcast slots, one per game. Cheap to clone; clones share slots.
#[derive(Clone, Default)]
pub struct RefreshChannel {
    slots: Arc<DashMap<String, watch::Sender<Option<SyncSignal>>>>,
}

impl RefreshChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for signals about `game_id`. Signals written before the call
    /// are not delivered.
    pub fn subscribe(&self, game_id: GameId) -> SignalReceiver {
        self.slots
            .entry(SyncSignal::key(game_id))
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }

    /// Overwrite the slot for the signal's game and wake its subscribers.
    pub fn publish(&self, signal: SyncSignal) {
        let key = SyncSignal::key(signal.game_id);
        let slot = self
            .slots
            .entry(key)
            .or_insert_with(|| watch::channel(None).0);
        slot.send_replace(Some(signal));
        trace!(
            game_id = signal.game_id,
            subscribers = slot.receiver_count(),
            "refresh signal published"
        );
    }

    /// Last signal written for a game.
    pub fn last(&self, game_id: GameId) -> Option<SyncSignal> {
        self.slots
            .get(&SyncSignal::key(game_id))
            .and_then(|slot| {
                let last = *slot.borrow();
                last
            })
    }

    /// Live listeners for a game. Drops to zero once every client watching
    /// it has shut down.
    pub fn subscriber_count(&self, game_id: GameId) -> usize {
        self.slots
            .get(&SyncSignal::key(game_id))
            .map_or(0, |slot| slot.receiver_count())
    }
}
