use actix_web::web;

pub mod cards;
pub mod games;
pub mod health;

/// Register every route. `main` and the route tests share this, so tests
/// exercise the same paths the server exposes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Games: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));

    // Cards: /api/cards/**
    cfg.service(web::scope("/api/cards").configure(cards::configure_routes));
}
