//! Id of the request being served.
//!
//! `RequestTrace` scopes the id around the whole handler future so error
//! bodies can report it without the id being passed down to them.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::future::Future;

use uuid::Uuid;

tokio::task_local! {
    static CURRENT: RequestId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept a caller-supplied id when it is a well-formed UUID.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.hyphenated().fmt(f)
    }
}

/// Id of the current request, if running inside one.
pub fn current() -> Option<RequestId> {
    CURRENT.try_with(|id| *id).ok()
}

/// Current request id as text; "unknown" outside a request.
pub fn trace_id() -> String {
    current().map_or_else(|| "unknown".to_string(), |id| id.to_string())
}

pub async fn scope<F: Future>(id: RequestId, future: F) -> F::Output {
    CURRENT.scope(id, future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn id_is_visible_only_inside_the_scope() {
        assert_eq!(trace_id(), "unknown");

        let id = RequestId::generate();
        let seen = scope(id, async { current() }).await;

        assert_eq!(seen, Some(id));
        assert_eq!(current(), None);
    }

    #[test]
    fn parses_only_uuids() {
        let id = RequestId::generate();
        assert_eq!(RequestId::parse(&id.to_string()), Some(id));
        assert_eq!(RequestId::parse("draw-42"), None);
    }
}
