//! Assertions for the backend's problem-details error contract.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Error body as clients see it.
#[derive(Debug, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
    pub success: bool,
    pub error: String,
}

/// Read an error response and check it against the contract.
///
/// Besides `status` and `code`, every error must echo its trace id in
/// `x-trace-id`, report `success: false`, and repeat `detail` as `error`.
/// `detail_contains`, when given, must appear in the detail text.
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    code: &str,
    status: StatusCode,
    detail_contains: Option<&str>,
) -> Problem {
    assert_eq!(resp.status(), status, "unexpected status for {code}");
    let header = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("error responses carry a readable x-trace-id");

    let body = actix_web::test::read_body(resp).await;
    let problem: Problem = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "body is not a problem document ({e}): {}",
            String::from_utf8_lossy(&body)
        )
    });

    assert_eq!(problem.trace_id, header);
    assert_eq!(problem.code, code);
    assert_eq!(problem.status, status.as_u16());
    assert!(problem.kind.ends_with(code), "type {} names the code", problem.kind);
    assert!(!problem.success);
    assert_eq!(problem.error, problem.detail);
    if let Some(fragment) = detail_contains {
        assert!(
            problem.detail.contains(fragment),
            "detail {:?} lacks {fragment:?}",
            problem.detail
        );
    }
    problem
}
