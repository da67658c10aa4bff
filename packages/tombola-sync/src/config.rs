//! Client configuration.
//!
//! The embedding application builds one (from the environment or with the
//! setters) and hands it to each client. Clients never read the environment.

use std::time::Duration;

use crate::error::SyncError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Shortest refresh period a client will run with.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// API root, e.g. `http://localhost:3001/api`. No trailing slash.
    pub base_url: String,
    /// Period of the refresh timer.
    pub poll_interval: Duration,
    /// Per-request timeout of the HTTP client.
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl SyncConfig {
    /// Read `TOMBOLA_API_URL`, `TOMBOLA_POLL_SECS` and
    /// `TOMBOLA_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SyncError> {
        let mut config = Self::default();
        if let Some(url) = lookup("TOMBOLA_API_URL").filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(secs) = seconds(&lookup, "TOMBOLA_POLL_SECS")? {
            config.poll_interval = secs;
        }
        if let Some(secs) = seconds(&lookup, "TOMBOLA_TIMEOUT_SECS")? {
            config.request_timeout = secs;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    /// Periods under [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, SyncError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(SyncError::Decode(format!(
            "{key} must be a positive number of seconds, got {raw:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = SyncConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.base_url, "http://localhost:3001/api");
    }

    #[test]
    fn env_overrides_and_trims_url() {
        let config = SyncConfig::from_lookup(|key| match key {
            "TOMBOLA_API_URL" => Some("https://tombola.example/api/".into()),
            "TOMBOLA_POLL_SECS" => Some("5".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url, "https://tombola.example/api");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn builder_raises_short_intervals() {
        let config = SyncConfig::default().with_poll_interval(Duration::ZERO);
        assert_eq!(config.poll_interval, MIN_POLL_INTERVAL);
        let config = SyncConfig::default().with_poll_interval(Duration::from_secs(45));
        assert_eq!(config.poll_interval, Duration::from_secs(45));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = SyncConfig::from_lookup(|key| (key == "TOMBOLA_POLL_SECS").then(|| "0".into()))
            .unwrap_err();
        assert!(err.to_string().contains("TOMBOLA_POLL_SECS"));
    }
}
