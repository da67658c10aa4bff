use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use tombola_core::{DomainError, GameId};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

/// A `{game_id}` route segment naming a game that exists.
///
/// Handlers taking this never see a bad or unknown id: non-numeric and
/// non-positive segments are `INVALID_GAME_ID`, ids the store does not
/// hold are `GAME_NOT_FOUND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameIdPath(pub GameId);

impl FromRequest for GameIdPath {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(known_game(req))
    }
}

fn parse_segment(raw: &str) -> Result<GameId, AppError> {
    match raw.parse::<GameId>() {
        Ok(id) if id > 0 => Ok(id),
        Ok(id) => Err(AppError::bad_request(
            ErrorCode::InvalidGameId,
            format!("game id must be positive, got {id}"),
        )),
        Err(_) => Err(AppError::bad_request(
            ErrorCode::InvalidGameId,
            format!("invalid game id {raw:?}"),
        )),
    }
}

fn known_game(req: &HttpRequest) -> Result<GameIdPath, AppError> {
    let raw = req
        .match_info()
        .get("game_id")
        .ok_or_else(|| AppError::internal("route has no {game_id} segment"))?;
    let id = parse_segment(raw)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("application state not registered"))?;
    if !state.games.store().exists(id) {
        return Err(DomainError::GameNotFound(id).into());
    }
    Ok(GameIdPath(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_must_be_positive_integers() {
        assert_eq!(parse_segment("12").unwrap(), 12);
        for raw in ["0", "-4", "abc", "1.5", ""] {
            let err = parse_segment(raw).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidGameId, "{raw:?}");
        }
    }
}
