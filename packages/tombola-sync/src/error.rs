//! Client-side error type.

use thiserror::Error;
use tombola_core::DomainError;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport failure: connection refused, timeout, broken body.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The backend answered, but not with what was asked for.
    #[error("fetch failed: {0}")]
    Fetch(String),
    /// The backend refused an operator action.
    #[error("rejected: {0}")]
    Rejected(#[from] DomainError),
    /// A payload could not be decoded or broke a domain invariant.
    #[error("invalid payload: {0}")]
    Decode(String),
}

impl SyncError {
    /// Failures that the next scheduled or signalled refresh may clear.
    pub fn is_transient(&self) -> bool {
        !matches!(self, SyncError::Rejected(_))
    }

    /// The domain rejection, if this is one.
    pub fn rejection(&self) -> Option<&DomainError> {
        match self {
            SyncError::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_not_transient() {
        let rejected = SyncError::from(DomainError::DuplicateDraw(4));
        assert!(!rejected.is_transient());
        assert_eq!(rejected.rejection(), Some(&DomainError::DuplicateDraw(4)));
        assert_eq!(
            rejected.to_string(),
            "rejected: number 4 has already been drawn"
        );

        let fetch = SyncError::Fetch("HTTP 502".into());
        assert!(fetch.is_transient());
        assert!(fetch.rejection().is_none());
    }
}
