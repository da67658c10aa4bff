//! HTTP middleware. Wrap order in `main`:
//!
//! App::new()
//!     .wrap(cors)
//!     .wrap(StructuredLogger)
//!     .wrap(TraceSpan)
//!     .wrap(RequestTrace)   // runs first, assigns the request id

pub mod cors;
pub mod request_trace;
pub mod structured_logger;
pub mod trace_span;

pub use cors::cors_middleware;
pub use request_trace::{RequestTrace, REQUEST_ID_HEADER};
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;

use tombola_core::GameId;

/// Game addressed by a request path, for log fields.
///
/// Middleware runs before routing, so this reads the raw path instead of
/// match info. Covers `/api/games/{id}/...` and `/api/cards/game/{id}`.
pub(crate) fn game_in_path(path: &str) -> Option<GameId> {
    let mut segments = path.trim_start_matches('/').split('/');
    let raw = match (segments.next(), segments.next(), segments.next()) {
        (Some("api"), Some("games"), Some(id)) => id,
        (Some("api"), Some("cards"), Some("game")) => segments.next()?,
        _ => return None,
    };
    raw.parse::<GameId>().ok().filter(|id| *id > 0)
}
