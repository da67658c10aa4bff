use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_json::Error as JsonError;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Every request body the API accepts is a few fields long.
pub const MAX_BODY_BYTES: usize = 8 * 1024;

/// JSON body extractor whose failures use the problem-details contract
/// (HTTP 400, `BAD_REQUEST`) instead of actix's plain-text default.
/// Empty and oversized bodies are rejected before parsing.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(_req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        Box::pin(async move {
            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(error = %e, "failed to read request body");
                    AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
                })?;
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    return Err(AppError::bad_request(
                        ErrorCode::BadRequest,
                        format!("Request body exceeds {MAX_BODY_BYTES} bytes"),
                    ));
                }
                body.extend_from_slice(&chunk);
            }

            if body.iter().all(u8::is_ascii_whitespace) {
                return Err(AppError::bad_request(
                    ErrorCode::BadRequest,
                    "Request body is required",
                ));
            }

            let parsed = serde_json::from_slice::<T>(&body).map_err(|e| {
                debug!(error = %e, body_size = body.len(), "JSON parsing failed");
                AppError::bad_request(ErrorCode::BadRequest, classify_json_error(&e))
            })?;

            Ok(ValidatedJson(parsed))
        })
    }
}

/// Client-facing description of a JSON failure. Never echoes the body.
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        Category::Syntax => format!("Invalid JSON at line {}", error.line()),
        Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        Category::Data => "Invalid JSON: wrong types for one or more fields".to_string(),
        Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use tombola_core::protocol::ManualDrawRequest;

    use super::*;

    #[test]
    fn syntax_errors_report_line() {
        let error = serde_json::from_str::<ManualDrawRequest>("{\n\"number\": }").unwrap_err();
        assert_eq!(classify_json_error(&error), "Invalid JSON at line 2");
    }

    #[test]
    fn truncated_body_is_eof() {
        let error = serde_json::from_str::<ManualDrawRequest>(r#"{"number": 4"#).unwrap_err();
        assert!(classify_json_error(&error).contains("unexpected end of input"));
    }

    #[test]
    fn wrong_field_type_is_data_error() {
        let error =
            serde_json::from_str::<ManualDrawRequest>(r#"{"number": "dodici"}"#).unwrap_err();
        assert!(classify_json_error(&error).contains("wrong types"));
    }

    #[actix_web::test]
    async fn empty_and_oversized_bodies_are_rejected() {
        let (req, mut payload) = actix_web::test::TestRequest::post()
            .set_payload("  \n")
            .to_http_parts();
        let err = ValidatedJson::<ManualDrawRequest>::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.detail(), "Request body is required");

        let big = format!(r#"{{"number": 7, "pad": "{}"}}"#, "x".repeat(MAX_BODY_BYTES));
        let (req, mut payload) = actix_web::test::TestRequest::post()
            .set_payload(big)
            .to_http_parts();
        let err = ValidatedJson::<ManualDrawRequest>::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert!(err.detail().contains("exceeds"));
    }

    #[test]
    fn deref_reaches_the_payload() {
        let mut body = ValidatedJson(ManualDrawRequest { number: 12 });
        body.number += 1;
        assert_eq!(body.into_inner().number, 13);
    }
}
