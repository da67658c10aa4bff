//! Per-game sync client.
//!
//! A spawned client owns one refresh timer and at most one refresh-channel
//! subscription. It fetches the game on mount, then again on every timer
//! tick, channel signal or explicit [`SyncHandle::refresh`]. Refreshes of
//! one client never overlap: triggers that arrive while a fetch is in flight
//! collapse into a single follow-up fetch.
//!
//! Dropping or shutting down the [`SyncHandle`] stops the timer, releases the
//! subscription and discards any fetch still in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tombola_core::GameId;
use tracing::{debug, warn};

use crate::api::GameApi;
use crate::channel::{RefreshChannel, SignalReceiver};
use crate::config::{SyncConfig, MIN_POLL_INTERVAL};
use crate::error::SyncError;
use crate::view::{GameSnapshot, SyncState, SyncView};

pub struct GameSyncClient {
    api: Arc<dyn GameApi>,
    game_id: GameId,
    poll_interval: Duration,
    signals: Option<SignalReceiver>,
}

impl GameSyncClient {
    /// A `poll_interval` under [`MIN_POLL_INTERVAL`] is raised to it.
    pub fn new(api: Arc<dyn GameApi>, game_id: GameId, config: &SyncConfig) -> Self {
        if config.poll_interval < MIN_POLL_INTERVAL {
            warn!(
                game_id,
                requested_ms = u64::try_from(config.poll_interval.as_millis()).unwrap_or(u64::MAX),
                "poll interval too short, using the minimum"
            );
        }
        Self {
            api,
            game_id,
            poll_interval: config.poll_interval.max(MIN_POLL_INTERVAL),
            signals: None,
        }
    }

    /// Also refresh on signals written to `channel` for this game. Without a
    /// channel the client relies on its timer alone.
    pub fn with_channel(mut self, channel: &RefreshChannel) -> Self {
        self.signals = Some(channel.subscribe(self.game_id));
        self
    }

    /// Start the background worker. Must be called inside a tokio runtime.
    pub fn spawn(self) -> SyncHandle {
        let (view_tx, view_rx) = watch::channel(SyncView::default());
        let manual = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let worker = Worker {
            api: self.api,
            game_id: self.game_id,
            period: self.poll_interval,
            signals: self.signals,
            manual: Arc::clone(&manual),
            cancel: cancel.clone(),
            view_tx,
        };
        let task = tokio::spawn(worker.run());

        SyncHandle {
            game_id: self.game_id,
            view_rx,
            manual,
            cancel,
            task: Some(task),
        }
    }
}

/// Owner side of a running client.
pub struct SyncHandle {
    game_id: GameId,
    view_rx: watch::Receiver<SyncView>,
    manual: Arc<Notify>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SyncHandle {
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Current view.
    pub fn view(&self) -> SyncView {
        self.view_rx.borrow().clone()
    }

    /// Receiver notified on every view change.
    pub fn subscribe(&self) -> watch::Receiver<SyncView> {
        self.view_rx.clone()
    }

    /// Ask for a refresh now. Coalesced with any refresh already in flight.
    pub fn refresh(&self) {
        self.manual.notify_one();
    }

    /// Wait until the view satisfies `ready`. Returns `None` once the client
    /// has stopped.
    pub async fn wait_for(&self, mut ready: impl FnMut(&SyncView) -> bool) -> Option<SyncView> {
        let mut rx = self.view_rx.clone();
        let view = match rx.wait_for(|view| ready(view)).await {
            Ok(view) => Some(view.clone()),
            Err(_) => None,
        };
        view
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the worker and wait until its timer and subscription are gone.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if err.is_panic() {
                    warn!(game_id = self.game_id, "sync worker panicked");
                }
            }
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

enum Trigger {
    Cancelled,
    Timer,
    Signal,
    SignalClosed,
    Manual,
}

enum Step {
    Cancelled,
    Fetched(Result<GameSnapshot, SyncError>),
    Trigger,
    SignalClosed,
}

#[derive(PartialEq, Eq)]
enum Cycle {
    Done,
    Cancelled,
}

struct Worker {
    api: Arc<dyn GameApi>,
    game_id: GameId,
    period: Duration,
    signals: Option<SignalReceiver>,
    manual: Arc<Notify>,
    cancel: CancellationToken,
    view_tx: watch::Sender<SyncView>,
}

impl Worker {
    async fn run(mut self) {
        debug!(game_id = self.game_id, "sync client mounted");
        if self.refresh_cycle().await == Cycle::Cancelled {
            return;
        }

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let trigger = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Trigger::Cancelled,
                _ = ticker.tick() => Trigger::Timer,
                alive = signal_changed(&mut self.signals) => {
                    if alive { Trigger::Signal } else { Trigger::SignalClosed }
                }
                _ = self.manual.notified() => Trigger::Manual,
            };

            match trigger {
                Trigger::Cancelled => break,
                Trigger::SignalClosed => {
                    self.signals = None;
                    continue;
                }
                Trigger::Timer => debug!(game_id = self.game_id, trigger = "timer", "refresh"),
                Trigger::Signal => debug!(game_id = self.game_id, trigger = "signal", "refresh"),
                Trigger::Manual => debug!(game_id = self.game_id, trigger = "manual", "refresh"),
            }

            if self.refresh_cycle().await == Cycle::Cancelled {
                break;
            }
            ticker.reset();
        }
        debug!(game_id = self.game_id, "sync client stopped");
    }

    /// One fetch, plus one follow-up if anything asked for a refresh while
    /// it was in flight.
    async fn refresh_cycle(&mut self) -> Cycle {
        loop {
            let previous = self.begin_fetch();
            let fetch = fetch_snapshot(Arc::clone(&self.api), self.game_id, previous);
            tokio::pin!(fetch);

            let mut pending = false;
            let result = loop {
                let step = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => Step::Cancelled,
                    result = &mut fetch => Step::Fetched(result),
                    alive = signal_changed(&mut self.signals) => {
                        if alive { Step::Trigger } else { Step::SignalClosed }
                    }
                    _ = self.manual.notified() => Step::Trigger,
                };
                match step {
                    Step::Cancelled => {
                        debug!(game_id = self.game_id, "in-flight refresh discarded");
                        return Cycle::Cancelled;
                    }
                    Step::Fetched(result) => break result,
                    Step::Trigger => pending = true,
                    Step::SignalClosed => self.signals = None,
                }
            };

            self.apply(result);
            if !pending {
                return Cycle::Done;
            }
            debug!(game_id = self.game_id, "coalesced refresh");
        }
    }

    /// Mark the view as fetching and hand back the snapshot being replaced.
    fn begin_fetch(&self) -> Option<GameSnapshot> {
        let mut previous = None;
        self.view_tx.send_modify(|view| {
            view.state = if view.snapshot.is_some() {
                SyncState::Refreshing
            } else {
                SyncState::Loading
            };
            previous = view.snapshot.clone();
        });
        previous
    }

    fn apply(&self, result: Result<GameSnapshot, SyncError>) {
        match result {
            Ok(snapshot) => {
                let drawn = snapshot.drawn_numbers.len();
                self.view_tx.send_modify(|view| {
                    view.state = SyncState::Ready;
                    view.snapshot = Some(snapshot);
                    view.error = None;
                    view.generation += 1;
                });
                debug!(game_id = self.game_id, drawn, "refresh applied");
            }
            Err(err) => {
                warn!(game_id = self.game_id, error = %err, "refresh failed");
                self.view_tx.send_modify(|view| {
                    view.state = SyncState::Error;
                    view.error = Some(err.to_string());
                });
            }
        }
    }
}

/// Resolves when the channel slot changes; `false` once the channel is gone.
/// Never resolves without a subscription.
async fn signal_changed(signals: &mut Option<SignalReceiver>) -> bool {
    match signals {
        Some(rx) => rx.changed().await.is_ok(),
        None => std::future::pending().await,
    }
}

/// Status first; the called-numbers list when status is unavailable.
async fn fetch_snapshot(
    api: Arc<dyn GameApi>,
    game_id: GameId,
    previous: Option<GameSnapshot>,
) -> Result<GameSnapshot, SyncError> {
    let status = api
        .status(game_id)
        .await
        .and_then(|dto| GameSnapshot::from_status(&dto));

    match status {
        Ok(snapshot) => Ok(snapshot),
        Err(err) if err.is_transient() => {
            debug!(game_id, error = %err, "status unavailable, using called numbers");
            let called = api.called_numbers(game_id).await?;
            GameSnapshot::from_called_numbers(game_id, &called, previous.as_ref())
        }
        Err(err) => Err(err),
    }
}
