//! JSON logging for the server binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Used when neither `TOMBOLA_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "info,actix_server=warn";

/// Filter directives: `TOMBOLA_LOG`, then `RUST_LOG`, then the default.
/// Blank values count as unset.
pub fn filter_directives(lookup: impl Fn(&str) -> Option<String>) -> String {
    ["TOMBOLA_LOG", "RUST_LOG"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber: one JSON object per line, no ANSI, span
/// fields flattened into each event.
///
/// Unparseable directives fall back to [`DEFAULT_FILTER`].
pub fn init_tracing() {
    let directives = filter_directives(|key| std::env::var(key).ok());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry().with(filter).with(json).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn tombola_log_wins_over_rust_log() {
        let env = [("TOMBOLA_LOG", "debug"), ("RUST_LOG", "trace")];
        assert_eq!(filter_directives(lookup(&env)), "debug");
    }

    #[test]
    fn blank_values_fall_through() {
        let env = [("TOMBOLA_LOG", "  "), ("RUST_LOG", "warn")];
        assert_eq!(filter_directives(lookup(&env)), "warn");
        assert_eq!(filter_directives(lookup(&[])), DEFAULT_FILTER);
    }
}
