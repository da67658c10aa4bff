//! Game lifecycle, draw and status routes, mounted at `/api/games`.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tombola_core::protocol::{
    ActionResponse, CreateGameRequest, DrawResponse, GameListResponse, GameStatusResponse,
    ManualDrawRequest,
};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{GameIdPath, ValidatedJson};
use crate::services::games::DEFAULT_LATEST_LIMIT;
use crate::state::app_state::AppState;

/// POST /api/games
async fn create_game(
    body: ValidatedJson<CreateGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request(
            ErrorCode::BadRequest,
            "Game name must not be empty",
        ));
    }

    let game = app_state.games.create(name);
    Ok(HttpResponse::Created().json(GameStatusResponse {
        success: true,
        game,
    }))
}

/// GET /api/games
async fn list_games(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(GameListResponse {
        success: true,
        games: app_state.games.list().await,
    }))
}

/// GET /api/games/active
async fn active_games(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(GameListResponse {
        success: true,
        games: app_state.games.active().await,
    }))
}

/// POST /api/games/{game_id}/start
///
/// Starting a running game is acknowledged without change.
async fn start_game(
    game_id: GameIdPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    app_state.games.start(game_id.0).await?;
    Ok(HttpResponse::Ok().json(ActionResponse::ok()))
}

/// POST /api/games/{game_id}/end
async fn end_game(
    game_id: GameIdPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    app_state.games.end(game_id.0).await?;
    Ok(HttpResponse::Ok().json(ActionResponse::ok()))
}

/// POST /api/games/{game_id}/draw/random
async fn draw_random(
    game_id: GameIdPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let number = app_state.games.draw_random(game_id.0).await?;
    Ok(HttpResponse::Ok().json(DrawResponse::drawn(number)))
}

/// POST /api/games/{game_id}/draw
async fn draw_manual(
    game_id: GameIdPath,
    body: ValidatedJson<ManualDrawRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let number = app_state.games.draw_manual(game_id.0, body.number).await?;
    Ok(HttpResponse::Ok().json(DrawResponse::drawn(number)))
}

/// GET /api/games/{game_id}/status
async fn game_status(
    game_id: GameIdPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game = app_state.games.status(game_id.0).await?;
    Ok(HttpResponse::Ok().json(GameStatusResponse {
        success: true,
        game,
    }))
}

/// GET /api/games/{game_id}/numbers
///
/// Bare list of `{number, drawnAt}`, most recent first.
async fn called_numbers(
    game_id: GameIdPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let numbers = app_state.games.numbers_desc(game_id.0).await?;
    Ok(HttpResponse::Ok().json(numbers))
}

#[derive(Debug, Deserialize)]
struct LatestQuery {
    limit: Option<usize>,
}

/// GET /api/games/{game_id}/numbers/latest?limit=N
async fn latest_numbers(
    game_id: GameIdPath,
    query: web::Query<LatestQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LATEST_LIMIT);
    let numbers = app_state.games.latest(game_id.0, limit).await?;
    Ok(HttpResponse::Ok().json(numbers))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_games))
            .route(web::post().to(create_game)),
    )
    .service(web::resource("/active").route(web::get().to(active_games)))
    .service(web::resource("/{game_id}/start").route(web::post().to(start_game)))
    .service(web::resource("/{game_id}/end").route(web::post().to(end_game)))
    .service(web::resource("/{game_id}/draw/random").route(web::post().to(draw_random)))
    .service(web::resource("/{game_id}/draw").route(web::post().to(draw_manual)))
    .service(web::resource("/{game_id}/status").route(web::get().to(game_status)))
    .service(web::resource("/{game_id}/numbers").route(web::get().to(called_numbers)))
    .service(web::resource("/{game_id}/numbers/latest").route(web::get().to(latest_numbers)));
}
