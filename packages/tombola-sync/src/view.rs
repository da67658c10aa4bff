//! View state published by a sync client.
//!
//! A [`GameSnapshot`] is the last consistent copy of a game as the backend
//! reported it. Everything a screen shows (the board, card grids, win
//! previews) is derived from the snapshot on demand, so a new snapshot
//! refreshes every derived view at once.

use tombola_core::protocol::{CalledNumber, GameStatusDto};
use tombola_core::rules::{MAX_NUMBER, POUCH_SIZE};
use tombola_core::{
    evaluate, map_to_grid, Card, DomainError, DrawnSet, Game, GameId, Grid, WinResult,
};

use crate::error::SyncError;

/// Where the client is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Spawned, nothing fetched yet.
    #[default]
    Idle,
    /// First fetch in flight.
    Loading,
    Ready,
    /// A refresh is in flight; the previous snapshot is still shown.
    Refreshing,
    /// The last fetch failed; the previous snapshot, if any, is still shown.
    Error,
}

/// Which endpoint produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Status,
    /// Status was unavailable; rebuilt from the called-numbers list.
    Numbers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub name: String,
    /// Draw order, oldest first.
    pub drawn_numbers: Vec<u8>,
    pub latest: Option<u8>,
    pub is_started: bool,
    pub is_ended: bool,
    pub source: SnapshotSource,
}

impl GameSnapshot {
    pub fn from_game(game: &Game, source: SnapshotSource) -> Self {
        Self {
            game_id: game.id(),
            name: game.name().to_string(),
            drawn_numbers: game.drawn_numbers().to_vec(),
            latest: game.latest(),
            is_started: game.is_started(),
            is_ended: game.is_ended(),
            source,
        }
    }

    /// Decode a status payload. Payloads that break game invariants are
    /// rejected rather than shown.
    pub fn from_status(dto: &GameStatusDto) -> Result<Self, SyncError> {
        let game = dto
            .to_game()
            .map_err(|e| SyncError::Decode(format!("game {}: {e}", dto.id)))?;
        let mut snapshot = Self::from_game(&game, SnapshotSource::Status);
        if let Some(last) = &dto.last_draw {
            if !snapshot.drawn_numbers.contains(&last.number) {
                return Err(SyncError::Decode(format!(
                    "game {}: last draw {} is not among the drawn numbers",
                    dto.id, last.number
                )));
            }
            snapshot.latest = Some(last.number);
        }
        Ok(snapshot)
    }

    /// Rebuild a snapshot from the called-numbers list (most recent first).
    ///
    /// The list carries no metadata, so the name and the ended flag come
    /// from `previous` when there is one.
    pub fn from_called_numbers(
        game_id: GameId,
        called: &[CalledNumber],
        previous: Option<&GameSnapshot>,
    ) -> Result<Self, SyncError> {
        let drawn: Vec<i32> = called.iter().rev().map(|c| i32::from(c.number)).collect();
        let name = previous.map(|p| p.name.clone()).unwrap_or_default();
        let is_started = !drawn.is_empty() || previous.is_some_and(|p| p.is_started);
        let is_ended = previous.is_some_and(|p| p.is_ended);

        let game = Game::from_parts(game_id, name, drawn, is_started, is_ended)
            .map_err(|e| SyncError::Decode(format!("game {game_id}: {e}")))?;
        Ok(Self::from_game(&game, SnapshotSource::Numbers))
    }

    /// The game this snapshot shows, for running the engine's checks
    /// locally.
    pub fn to_game(&self) -> Result<Game, DomainError> {
        Game::from_parts(
            self.game_id,
            self.name.clone(),
            self.drawn_numbers.iter().map(|&n| i32::from(n)).collect(),
            self.is_started,
            self.is_ended,
        )
    }

    /// Numbers a viewer should display. An ended game shows a blank board.
    pub fn visible_numbers(&self) -> &[u8] {
        if self.is_ended {
            &[]
        } else {
            &self.drawn_numbers
        }
    }

    pub fn visible_latest(&self) -> Option<u8> {
        if self.is_ended {
            None
        } else {
            self.latest
        }
    }

    pub fn drawn_set(&self) -> DrawnSet {
        self.visible_numbers().iter().collect()
    }

    pub fn is_drawn(&self, number: u8) -> bool {
        self.drawn_numbers.contains(&number)
    }

    pub fn board(&self) -> BoardSummary {
        let mut drawn = [false; POUCH_SIZE];
        for n in self.visible_numbers() {
            if let Some(flag) = usize::from(*n).checked_sub(1).and_then(|i| drawn.get_mut(i)) {
                *flag = true;
            }
        }
        let total_drawn = self.visible_numbers().len();
        BoardSummary {
            drawn,
            latest: self.visible_latest(),
            total_drawn,
            remaining: POUCH_SIZE - total_drawn,
        }
    }

    /// Grid and win preview for one card. A malformed card yields
    /// [`CardView::Malformed`] without affecting any other card.
    pub fn card_view(&self, card: &Card) -> CardView {
        let drawn = self.drawn_set();
        let view = map_to_grid(&card.cells)
            .and_then(|grid| evaluate(&card.cells, &drawn).map(|win| (grid, win)));
        match view {
            Ok((grid, win)) => CardView::Ok { grid, win },
            Err(err) => CardView::Malformed {
                reason: err.to_string(),
            },
        }
    }
}

/// The public 90-number board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSummary {
    /// `drawn[n - 1]` is set once `n` has been drawn.
    pub drawn: [bool; POUCH_SIZE],
    pub latest: Option<u8>,
    pub total_drawn: usize,
    pub remaining: usize,
}

impl BoardSummary {
    pub fn is_drawn(&self, number: u8) -> bool {
        usize::from(number)
            .checked_sub(1)
            .and_then(|i| self.drawn.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Nine rows of ten, drawn numbers in brackets.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for n in 1..=MAX_NUMBER {
            if self.is_drawn(n) {
                out.push_str(&format!("[{n:>2}]"));
            } else {
                out.push_str(&format!(" {n:>2} "));
            }
            if n % 10 == 0 {
                out.push('\n');
            }
        }
        match self.latest {
            Some(latest) => out.push_str(&format!(
                "latest: {latest}  drawn: {}  remaining: {}\n",
                self.total_drawn, self.remaining
            )),
            None => out.push_str(&format!(
                "latest: -  drawn: {}  remaining: {}\n",
                self.total_drawn, self.remaining
            )),
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardView {
    Ok { grid: Grid, win: WinResult },
    Malformed { reason: String },
}

/// What a sync client publishes after every state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncView {
    pub state: SyncState,
    /// Last good snapshot; survives failed refreshes.
    pub snapshot: Option<GameSnapshot>,
    /// Message of the last failure, cleared by the next success.
    pub error: Option<String>,
    /// Number of snapshots applied so far.
    pub generation: u64,
}

impl SyncView {
    pub fn is_ready(&self) -> bool {
        matches!(self.state, SyncState::Ready)
    }

    pub fn drawn_numbers(&self) -> &[u8] {
        self.snapshot
            .as_ref()
            .map(GameSnapshot::visible_numbers)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;
    use tombola_core::protocol::LastDraw;
    use tombola_core::WinLevel;

    use super::*;

    const CELLS: [i32; 15] = [5, 12, 24, 33, 41, 7, 18, 31, 52, 78, 1, 43, 55, 77, 89];

    fn status(drawn: Vec<i32>, ended: bool) -> GameStatusDto {
        let now = OffsetDateTime::now_utc();
        GameStatusDto {
            id: 4,
            name: "Sagra".into(),
            last_draw: drawn.last().map(|n| LastDraw { number: *n as u8 }),
            total_numbers_drawn: drawn.len(),
            drawn_numbers: drawn,
            started_at: Some(now),
            ended_at: ended.then_some(now),
            is_active: !ended,
        }
    }

    fn called(desc: &[u8]) -> Vec<CalledNumber> {
        desc.iter()
            .map(|n| CalledNumber {
                number: *n,
                drawn_at: OffsetDateTime::now_utc(),
            })
            .collect()
    }

    #[test]
    fn status_snapshot_keeps_draw_order() {
        let snap = GameSnapshot::from_status(&status(vec![5, 12, 24], false)).unwrap();
        assert_eq!(snap.drawn_numbers, vec![5, 12, 24]);
        assert_eq!(snap.latest, Some(24));
        assert_eq!(snap.source, SnapshotSource::Status);
    }

    #[test]
    fn status_with_duplicates_is_rejected() {
        let err = GameSnapshot::from_status(&status(vec![5, 5], false)).unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
    }

    #[test]
    fn numbers_fallback_reverses_and_keeps_metadata() {
        let previous = GameSnapshot::from_status(&status(vec![5], false)).unwrap();
        let snap =
            GameSnapshot::from_called_numbers(4, &called(&[24, 12, 5]), Some(&previous)).unwrap();
        assert_eq!(snap.drawn_numbers, vec![5, 12, 24]);
        assert_eq!(snap.latest, Some(24));
        assert_eq!(snap.name, "Sagra");
        assert_eq!(snap.source, SnapshotSource::Numbers);
    }

    #[test]
    fn ended_games_show_a_blank_board() {
        let snap = GameSnapshot::from_status(&status(vec![5, 12], true)).unwrap();
        assert!(snap.visible_numbers().is_empty());
        let board = snap.board();
        assert_eq!(board.total_drawn, 0);
        assert_eq!(board.remaining, 90);
        assert_eq!(board.latest, None);
    }

    #[test]
    fn board_flags_drawn_numbers() {
        let snap = GameSnapshot::from_status(&status(vec![1, 90, 45], false)).unwrap();
        let board = snap.board();
        assert!(board.is_drawn(1) && board.is_drawn(90) && board.is_drawn(45));
        assert!(!board.is_drawn(2));
        assert_eq!((board.total_drawn, board.remaining), (3, 87));

        let text = board.render();
        assert!(text.starts_with("[ 1]  2 "));
        assert!(text.contains("[90]"));
        assert!(text.ends_with("latest: 45  drawn: 3  remaining: 87\n"));
    }

    #[test]
    fn card_views_are_independent() {
        let snap = GameSnapshot::from_status(&status(vec![5, 12, 24, 33, 41], false)).unwrap();

        let good = Card::new(1, "Rossa", CELLS.to_vec());
        match snap.card_view(&good) {
            CardView::Ok { grid, win } => {
                assert_eq!(grid.filled(), 15);
                assert_eq!(win.level, WinLevel::Cinquina);
            }
            other => panic!("unexpected {other:?}"),
        }

        let bad = Card::new(2, "Rotta", vec![1, 2, 3]);
        assert_eq!(
            snap.card_view(&bad),
            CardView::Malformed {
                reason: "malformed card: expected 15 numbers, got 3".into()
            }
        );
    }
}
