//! Card routes, mounted at `/api/cards`.

use actix_web::{web, HttpResponse};
use tombola_core::protocol::{WinCheckRequest, WinCheckResponse};

use crate::error::AppError;
use crate::extractors::{GameIdPath, ValidatedJson};
use crate::services::PageQuery;
use crate::state::app_state::AppState;

/// GET /api/cards/game/{game_id}?page&limit&search
async fn cards_for_game(
    game_id: GameIdPath,
    query: web::Query<PageQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = app_state.cards.page(game_id.0, &query)?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /api/cards/check-win
async fn check_win(
    body: ValidatedJson<WinCheckRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let WinCheckRequest { game_id, card_id } = body.into_inner();
    let result = app_state.cards.check_win(game_id, card_id).await?;

    Ok(HttpResponse::Ok().json(WinCheckResponse {
        success: true,
        win_level: Some(result.level),
        message: Some(result.message()),
        error: None,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/game/{game_id}").route(web::get().to(cards_for_game)))
        .service(web::resource("/check-win").route(web::post().to(check_win)));
}
