//! Operator control panel.
//!
//! Wraps the backend actions with the operator-side rules: manual numbers
//! are checked against the last known state before any request is sent,
//! local state changes only after the backend confirms, and every confirmed
//! action is announced on the refresh channel.

use std::sync::Arc;

use tombola_core::draw::validate_manual;
use tombola_core::rules::in_range;
use tombola_core::{DomainError, GameId};
use tracing::info;

use crate::api::GameApi;
use crate::channel::{RefreshChannel, SyncSignal};
use crate::client::{GameSyncClient, SyncHandle};
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::view::SyncView;

pub struct ControlPanel {
    api: Arc<dyn GameApi>,
    channel: RefreshChannel,
    game_id: GameId,
    sync: SyncHandle,
}

impl ControlPanel {
    /// Open the panel for one game. Spawns a sync client subscribed to
    /// `channel`, so the panel sees its own confirmed actions like any other
    /// viewer on the channel.
    pub fn open(
        api: Arc<dyn GameApi>,
        channel: RefreshChannel,
        game_id: GameId,
        config: &SyncConfig,
    ) -> Self {
        let sync = GameSyncClient::new(Arc::clone(&api), game_id, config)
            .with_channel(&channel)
            .spawn();
        Self {
            api,
            channel,
            game_id,
            sync,
        }
    }

    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    pub fn view(&self) -> SyncView {
        self.sync.view()
    }

    pub fn sync(&self) -> &SyncHandle {
        &self.sync
    }

    pub async fn start(&self) -> Result<(), SyncError> {
        self.api.start(self.game_id).await?;
        self.confirmed("start");
        Ok(())
    }

    /// End the game. Viewers blank their board once they see the ended
    /// state.
    pub async fn end(&self) -> Result<(), SyncError> {
        self.api.end(self.game_id).await?;
        self.confirmed("end");
        Ok(())
    }

    pub async fn draw_random(&self) -> Result<u8, SyncError> {
        let number = self.api.draw_random(self.game_id).await?;
        info!(game_id = self.game_id, number, kind = "random", "draw confirmed");
        self.confirmed("draw");
        Ok(number)
    }

    /// Draw a called-out number.
    ///
    /// The last known state goes through the same validation the backend
    /// runs, so a draw on an inactive game, an out-of-range number or a
    /// number already shown as drawn is refused with the backend's error
    /// without contacting it. A view that has not caught up with a start
    /// refuses until its next refresh. Before the first snapshot only the
    /// range is checked.
    pub async fn draw_manual(&self, number: i32) -> Result<u8, SyncError> {
        self.precheck_manual(number)?;
        let drawn = self.api.draw_manual(self.game_id, number).await?;
        info!(game_id = self.game_id, number = drawn, kind = "manual", "draw confirmed");
        self.confirmed("draw");
        Ok(drawn)
    }

    fn precheck_manual(&self, number: i32) -> Result<(), DomainError> {
        match self.sync.view().snapshot {
            Some(snapshot) => validate_manual(&snapshot.to_game()?, number).map(drop),
            None if !in_range(number) => Err(DomainError::OutOfRange(number)),
            None => Ok(()),
        }
    }

    fn confirmed(&self, action: &'static str) {
        self.channel.publish(SyncSignal::now(self.game_id));
        info!(game_id = self.game_id, action, "refresh signal sent");
    }

    pub async fn close(self) {
        self.sync.shutdown().await;
    }
}
