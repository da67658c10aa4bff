#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error as ActixError};
use serde::de::DeserializeOwned;
use tombola_backend::infra::seed::{SeedCard, SeedFile, SeedGame};
use tombola_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use tombola_backend::{build_state, routes, AppState};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub const SAMPLE_CELLS: [i32; 15] = [5, 12, 24, 33, 41, 7, 18, 31, 52, 78, 1, 43, 55, 77, 89];

/// Empty state with a fixed draw seed.
pub fn empty_state() -> AppState {
    build_state()
        .with_rng_seed(42)
        .build()
        .expect("empty state builds")
}

/// Game 1 "Sagra" started with no draws, game 2 "Natale" idle, and two
/// cards on game 1: a valid one (id 1) and a malformed one (id 2).
pub fn seeded_state() -> AppState {
    let seed = SeedFile {
        games: vec![
            SeedGame {
                id: 1,
                name: "Sagra".into(),
                drawn_numbers: vec![],
                is_started: true,
                is_ended: false,
            },
            SeedGame {
                id: 2,
                name: "Natale".into(),
                drawn_numbers: vec![],
                is_started: false,
                is_ended: false,
            },
        ],
        cards: vec![
            SeedCard {
                game_id: 1,
                name: "Cartella Rossa".into(),
                cells: SAMPLE_CELLS.to_vec(),
            },
            SeedCard {
                game_id: 1,
                name: "Cartella Rotta".into(),
                cells: vec![1, 1, 2],
            },
        ],
    };

    build_state()
        .with_seed(seed)
        .with_rng_seed(42)
        .build()
        .expect("seeded state builds")
}

/// Initialized test service with the production routes and middleware
/// (CORS aside).
pub async fn test_app(
    state: AppState,
) -> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = ActixError> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}

pub async fn get_json<S, T>(app: &S, uri: &str) -> T
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = ActixError>,
    T: DeserializeOwned,
{
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "GET {uri} -> {}", resp.status());
    test::read_body_json(resp).await
}

pub async fn post<S>(
    app: &S,
    uri: &str,
    body: Option<serde_json::Value>,
) -> ServiceResponse<BoxBody>
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = ActixError>,
{
    let req = match body {
        Some(json) => test::TestRequest::post().uri(uri).set_json(json),
        None => test::TestRequest::post().uri(uri),
    };
    test::call_service(app, req.to_request()).await
}
