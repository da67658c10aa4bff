//! Mapping from domain rejections to HTTP errors.
//!
//! Services return `Result<T, DomainError>`; handlers return
//! `Result<T, AppError>` and rely on this conversion.

use actix_web::http::StatusCode;
use tombola_core::DomainError;

use crate::error::AppError;
use crate::errors::ErrorCode;

/// HTTP status for a domain rejection.
pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::MalformedCard(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::OutOfRange(_) => StatusCode::BAD_REQUEST,
        DomainError::GameNotFound(_) | DomainError::CardNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::GameNotActive
        | DomainError::GameEnded
        | DomainError::DuplicateDraw(_)
        | DomainError::GameExhausted => StatusCode::CONFLICT,
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Domain {
            code: ErrorCode::from(&err),
            status: status_for(&err),
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tombola_core::CardDefect;

    use super::*;

    #[test]
    fn draw_conflicts_are_409() {
        for err in [
            DomainError::GameNotActive,
            DomainError::GameEnded,
            DomainError::DuplicateDraw(5),
            DomainError::GameExhausted,
        ] {
            assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn range_and_shape_are_client_errors() {
        assert_eq!(
            AppError::from(DomainError::OutOfRange(91)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(DomainError::MalformedCard(CardDefect::Duplicate(3))).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(DomainError::GameNotFound(9)).status(),
            StatusCode::NOT_FOUND
        );
    }
}
