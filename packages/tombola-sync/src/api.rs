//! Request/response contract with the backend.
//!
//! [`GameApi`] is the seam the sync client and the control panel are built
//! on; [`HttpGameApi`] talks to the real server over HTTP.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tombola_core::errors::codes;
use tombola_core::protocol::{
    ActionResponse, CalledNumber, CardPage, CreateGameRequest, DrawResponse, ErrorBody,
    GameStatusDto, GameStatusResponse, ManualDrawRequest, WinCheckRequest, WinCheckResponse,
};
use tombola_core::{CardId, DomainError, GameId};

use crate::config::SyncConfig;
use crate::error::SyncError;

#[async_trait]
pub trait GameApi: Send + Sync {
    async fn create_game(&self, name: &str) -> Result<GameStatusDto, SyncError>;

    async fn start(&self, game_id: GameId) -> Result<(), SyncError>;

    async fn end(&self, game_id: GameId) -> Result<(), SyncError>;

    /// Returns the number drawn by the server.
    async fn draw_random(&self, game_id: GameId) -> Result<u8, SyncError>;

    async fn draw_manual(&self, game_id: GameId, number: i32) -> Result<u8, SyncError>;

    async fn status(&self, game_id: GameId) -> Result<GameStatusDto, SyncError>;

    /// Called numbers, most recent first.
    async fn called_numbers(&self, game_id: GameId) -> Result<Vec<CalledNumber>, SyncError>;

    async fn cards(
        &self,
        game_id: GameId,
        page: usize,
        limit: usize,
        search: Option<&str>,
    ) -> Result<CardPage, SyncError>;

    async fn check_win(
        &self,
        game_id: GameId,
        card_id: CardId,
    ) -> Result<WinCheckResponse, SyncError>;
}

/// What a failed call was about, for rebuilding domain rejections.
#[derive(Debug, Clone, Copy, Default)]
struct CallContext {
    game_id: GameId,
    number: Option<i32>,
    card_id: Option<CardId>,
}

impl CallContext {
    fn game(game_id: GameId) -> Self {
        Self {
            game_id,
            ..Self::default()
        }
    }
}

pub struct HttpGameApi {
    client: Client,
    base_url: String,
}

impl HttpGameApi {
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, ctx: CallContext) -> Result<T, SyncError> {
        let resp = self.client.get(self.url(path)).send().await?;
        decode(resp, ctx).await
    }

    async fn post<B, T>(&self, path: &str, body: Option<&B>, ctx: CallContext) -> Result<T, SyncError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut req = self.client.post(self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }
        decode(req.send().await?, ctx).await
    }

    async fn action(&self, path: &str, ctx: CallContext) -> Result<(), SyncError> {
        let resp: ActionResponse = self.post::<(), _>(path, None, ctx).await?;
        if resp.success {
            Ok(())
        } else {
            Err(SyncError::Fetch(
                resp.error.unwrap_or_else(|| "action failed".to_string()),
            ))
        }
    }
}

#[async_trait]
impl GameApi for HttpGameApi {
    async fn create_game(&self, name: &str) -> Result<GameStatusDto, SyncError> {
        let body = CreateGameRequest {
            name: name.to_string(),
        };
        let resp: GameStatusResponse = self
            .post("/games", Some(&body), CallContext::default())
            .await?;
        Ok(resp.game)
    }

    async fn start(&self, game_id: GameId) -> Result<(), SyncError> {
        self.action(&format!("/games/{game_id}/start"), CallContext::game(game_id))
            .await
    }

    async fn end(&self, game_id: GameId) -> Result<(), SyncError> {
        self.action(&format!("/games/{game_id}/end"), CallContext::game(game_id))
            .await
    }

    async fn draw_random(&self, game_id: GameId) -> Result<u8, SyncError> {
        let resp: DrawResponse = self
            .post::<(), _>(
                &format!("/games/{game_id}/draw/random"),
                None,
                CallContext::game(game_id),
            )
            .await?;
        drawn_number(resp)
    }

    async fn draw_manual(&self, game_id: GameId, number: i32) -> Result<u8, SyncError> {
        let ctx = CallContext {
            number: Some(number),
            ..CallContext::game(game_id)
        };
        let resp: DrawResponse = self
            .post(
                &format!("/games/{game_id}/draw"),
                Some(&ManualDrawRequest { number }),
                ctx,
            )
            .await?;
        drawn_number(resp)
    }

    async fn status(&self, game_id: GameId) -> Result<GameStatusDto, SyncError> {
        let resp: GameStatusResponse = self
            .get(&format!("/games/{game_id}/status"), CallContext::game(game_id))
            .await?;
        if !resp.success {
            return Err(SyncError::Fetch(format!("status of game {game_id} unavailable")));
        }
        Ok(resp.game)
    }

    async fn called_numbers(&self, game_id: GameId) -> Result<Vec<CalledNumber>, SyncError> {
        self.get(&format!("/games/{game_id}/numbers"), CallContext::game(game_id))
            .await
    }

    async fn cards(
        &self,
        game_id: GameId,
        page: usize,
        limit: usize,
        search: Option<&str>,
    ) -> Result<CardPage, SyncError> {
        let mut req = self
            .client
            .get(self.url(&format!("/cards/game/{game_id}")))
            .query(&[("page", page), ("limit", limit)]);
        if let Some(term) = search.filter(|t| !t.trim().is_empty()) {
            req = req.query(&[("search", term)]);
        }
        decode(req.send().await?, CallContext::game(game_id)).await
    }

    async fn check_win(
        &self,
        game_id: GameId,
        card_id: CardId,
    ) -> Result<WinCheckResponse, SyncError> {
        let ctx = CallContext {
            card_id: Some(card_id),
            ..CallContext::game(game_id)
        };
        self.post(
            "/cards/check-win",
            Some(&WinCheckRequest { game_id, card_id }),
            ctx,
        )
        .await
    }
}

fn drawn_number(resp: DrawResponse) -> Result<u8, SyncError> {
    match resp {
        DrawResponse {
            success: true,
            number: Some(n),
            ..
        } => Ok(n),
        DrawResponse {
            success: true,
            number: None,
            ..
        } => Err(SyncError::Decode("draw response without a number".to_string())),
        DrawResponse { error, .. } => Err(SyncError::Fetch(
            error.unwrap_or_else(|| "draw failed".to_string()),
        )),
    }
}

async fn decode<T: DeserializeOwned>(resp: Response, ctx: CallContext) -> Result<T, SyncError> {
    let status = resp.status();
    let body = resp.bytes().await?;
    if status.is_success() {
        serde_json::from_slice(&body).map_err(|e| SyncError::Decode(e.to_string()))
    } else {
        Err(error_from_body(status, &body, ctx))
    }
}

/// Turn a non-2xx answer into the error the caller should see. Known
/// domain codes become [`SyncError::Rejected`]; anything else is a fetch
/// failure carrying the server's message.
fn error_from_body(status: StatusCode, body: &[u8], ctx: CallContext) -> SyncError {
    let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) else {
        return SyncError::Fetch(format!("HTTP {status}"));
    };

    let rejection = parsed.code.as_deref().and_then(|code| match code {
        codes::CARD_NOT_FOUND => ctx.card_id.map(DomainError::CardNotFound),
        other => DomainError::from_game_code(other, ctx.game_id, ctx.number),
    });

    match rejection {
        Some(err) => SyncError::Rejected(err),
        None => SyncError::Fetch(
            parsed
                .error
                .unwrap_or_else(|| format!("HTTP {status}")),
        ),
    }
}
