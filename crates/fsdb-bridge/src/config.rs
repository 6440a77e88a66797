//! Client configuration.

use std::time::Duration;

/// Default FSDB host the native bridge talks to.
pub const DEFAULT_HOST: &str = "::1";

/// Default time a subscribe call waits for its status flag.
pub const DEFAULT_SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Default interval between status flag reads while waiting.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Session identifier handed to the native side.
    pub client_id: String,

    /// FSDB host, used to build subscription keys.
    pub host: String,

    /// How long a subscribe call waits for its flag. Zero means one immediate check.
    pub subscribe_timeout: Duration,

    /// Interval between status flag reads.
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given client id.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            host: DEFAULT_HOST.to_string(),
            subscribe_timeout: DEFAULT_SUBSCRIBE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the FSDB host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the subscribe readiness timeout.
    pub fn with_subscribe_timeout(mut self, timeout: Duration) -> Self {
        self.subscribe_timeout = timeout;
        self
    }

    /// Set the poll interval. Clamped to at least one millisecond.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(generate_client_id())
    }
}

/// Generate a unique client identifier.
pub fn generate_client_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    format!("fsdb-client-{:x}", timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.client_id.starts_with("fsdb-client-"));
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.subscribe_timeout, DEFAULT_SUBSCRIBE_TIMEOUT);
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("bgp-agent")
            .with_host("fsdb.local")
            .with_subscribe_timeout(Duration::from_secs(10))
            .with_poll_interval(Duration::from_millis(5));

        assert_eq!(config.client_id, "bgp-agent");
        assert_eq!(config.host, "fsdb.local");
        assert_eq!(config.subscribe_timeout, Duration::from_secs(10));
        assert_eq!(config.poll_interval, Duration::from_millis(5));
    }

    #[test]
    fn test_poll_interval_clamped() {
        let config = ClientConfig::new("c").with_poll_interval(Duration::ZERO);
        assert_eq!(config.poll_interval, Duration::from_millis(1));
    }
}
