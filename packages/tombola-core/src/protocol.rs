//! JSON wire contract between the backend and its viewers.
//!
//! Field names are camelCase. Every response carries `success`; failures add
//! `error` (human readable) and `code` (stable SCREAMING_SNAKE_CASE).

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::card::{Card, CardId};
use crate::errors::DomainError;
use crate::game::{Game, GameId};
use crate::win::WinLevel;

/// Plain acknowledgement, used by start/end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DrawResponse {
    pub fn drawn(number: u8) -> Self {
        Self {
            success: true,
            number: Some(number),
            error: None,
        }
    }
}

/// Failure body. The server adds problem-details members around these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualDrawRequest {
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastDraw {
    pub number: u8,
}

/// Game metadata as reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatusDto {
    pub id: GameId,
    pub name: String,
    /// Draw order, oldest first.
    pub drawn_numbers: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_draw: Option<LastDraw>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub total_numbers_drawn: usize,
}

impl GameStatusDto {
    /// Decode into a domain game, rejecting payloads that break its
    /// invariants.
    pub fn to_game(&self) -> Result<Game, DomainError> {
        Game::from_parts(
            self.id,
            self.name.clone(),
            self.drawn_numbers.clone(),
            self.started_at.is_some(),
            self.ended_at.is_some(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatusResponse {
    pub success: bool,
    pub game: GameStatusDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListResponse {
    pub success: bool,
    pub games: Vec<GameStatusDto>,
}

/// One entry of the called-numbers list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalledNumber {
    pub number: u8,
    #[serde(with = "time::serde::rfc3339")]
    pub drawn_at: OffsetDateTime,
}

/// Page of cards for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPage {
    pub data: Vec<Card>,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinCheckRequest {
    pub game_id: GameId,
    pub card_id: CardId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinCheckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_level: Option<WinLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_payload_decodes() {
        let payload = json!({
            "success": true,
            "game": {
                "id": 4,
                "name": "Sagra",
                "drawnNumbers": [17, 3],
                "lastDraw": { "number": 3 },
                "startedAt": "2025-12-24T20:00:00Z",
                "endedAt": null
            }
        });
        let resp: GameStatusResponse = serde_json::from_value(payload).unwrap();
        let game = resp.game.to_game().unwrap();
        assert!(game.is_active());
        assert_eq!(game.latest(), Some(3));
        assert_eq!(resp.game.last_draw, Some(LastDraw { number: 3 }));
    }

    #[test]
    fn draw_response_omits_empty_fields() {
        let value = serde_json::to_value(DrawResponse::drawn(42)).unwrap();
        assert_eq!(value, json!({ "success": true, "number": 42 }));
    }

    #[test]
    fn called_numbers_use_rfc3339() {
        let raw = json!([{ "number": 9, "drawnAt": "2025-01-01T10:00:00Z" }]);
        let list: Vec<CalledNumber> = serde_json::from_value(raw).unwrap();
        assert_eq!(list[0].number, 9);
        assert_eq!(list[0].drawn_at.year(), 2025);
    }
}
