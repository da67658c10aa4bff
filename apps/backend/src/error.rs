//! The backend's single HTTP error type.
//!
//! Every failure leaves as `application/problem+json` with the request id
//! in both the body and `x-trace-id`. The body also carries `success: false`
//! and an `error` message, the envelope Tombola clients check first.

use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::ErrorCode;
use crate::trace_ctx;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

#[derive(Error, Debug)]
pub enum AppError {
    /// Rejection from the draw engine or game store.
    #[error("{detail}")]
    Domain {
        code: ErrorCode,
        status: StatusCode,
        detail: String,
    },
    #[error("bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("internal error: {detail}")]
    Internal { detail: String },
    /// Startup problems: environment, seed file.
    #[error("configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Domain { code, .. } | Self::BadRequest { code, .. } => *code,
            Self::Internal { .. } => ErrorCode::Internal,
            Self::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain { status, .. } => *status,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } | Self::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to clients, without the variant prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Domain { detail, .. }
            | Self::BadRequest { detail, .. }
            | Self::Internal { detail }
            | Self::Config { detail } => detail,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::internal(format!("io error: {e}"))
    }
}

/// RFC 7807 body plus the `success`/`error` envelope.
#[derive(Debug, Serialize)]
struct Problem<'a> {
    #[serde(rename = "type")]
    kind: String,
    title: &'static str,
    status: u16,
    detail: &'a str,
    code: &'static str,
    trace_id: &'a str,
    success: bool,
    error: &'a str,
}

impl<'a> Problem<'a> {
    fn new(err: &'a AppError, trace_id: &'a str) -> Self {
        let code = err.code();
        Self {
            kind: format!("https://tombola.app/errors/{code}"),
            title: code.title(),
            status: err.status().as_u16(),
            detail: err.detail(),
            code: code.as_str(),
            trace_id,
            success: false,
            error: err.detail(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let trace_id = trace_ctx::trace_id();
        let body = Problem::new(self, &trace_id);

        HttpResponse::build(self.status())
            .content_type("application/problem+json")
            .insert_header((TRACE_ID_HEADER, trace_id.as_str()))
            .json(body)
    }
}
