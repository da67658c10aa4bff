use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};

use super::REQUEST_ID_HEADER;
use crate::error::TRACE_ID_HEADER;

/// CORS for browser viewers on the configured origins.
///
/// Viewers only read and the control panel only posts, so nothing beyond
/// GET and POST is allowed. Both id headers are exposed so a browser can
/// quote them when reporting a failed draw.
pub fn cors_middleware(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(["GET", "POST"])
        .allowed_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([
            HeaderName::from_static(TRACE_ID_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .max_age(3600);

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
