//! Liveness probe. Reports how many games the store holds and how many are
//! running, so an operator can tell a fresh process from a busy one.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
    games: usize,
    running: usize,
    uptime_secs: i64,
    checked_at: String,
}

async fn health(app_state: web::Data<AppState>) -> HttpResponse {
    let now = OffsetDateTime::now_utc();
    HttpResponse::Ok().json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        games: app_state.games.store().len(),
        running: app_state.games.active().await.len(),
        uptime_secs: (now - app_state.booted_at).whole_seconds(),
        checked_at: now.format(&Rfc3339).unwrap_or_default(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
