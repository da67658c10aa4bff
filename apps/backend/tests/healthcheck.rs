mod common;

use actix_web::test;
use serde_json::Value;

use common::{empty_state, seeded_state, test_app};

async fn health_body(app_state: tombola_backend::AppState) -> Value {
    let app = test_app(app_state).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn health_counts_games_and_running_games() {
    let body = health_body(seeded_state()).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["games"], 2);
    assert_eq!(body["running"], 1);
    assert!(body["checked_at"].as_str().is_some_and(|t| t.contains('T')));
}

#[actix_web::test]
async fn health_on_an_empty_store() {
    let body = health_body(empty_state()).await;

    assert_eq!(body["games"], 0);
    assert_eq!(body["running"], 0);
}
