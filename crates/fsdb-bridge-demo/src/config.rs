//! Demo configuration.

use std::time::Duration;

use clap::Parser;
use fsdb_bridge::config::{generate_client_id, DEFAULT_HOST};
use fsdb_bridge::ClientConfig;

/// Default subscribe readiness timeout in milliseconds.
pub const DEFAULT_SUBSCRIBE_TIMEOUT_MS: u64 = 2000;

/// Default status poll interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default loopback subscription latency in milliseconds.
pub const DEFAULT_LOOPBACK_LATENCY_MS: u64 = 250;

/// Resolved demo configuration.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Client settings handed to the bridge.
    pub client: ClientConfig,

    /// Subscription latency of the loopback bridge.
    pub loopback_latency: Duration,

    /// Exit after reporting status instead of blocking.
    pub once: bool,

    /// Print the status report as JSON on stdout.
    pub json: bool,
}

/// Command-line arguments for the demo.
#[derive(Parser, Debug)]
#[command(name = "fsdb-demo")]
#[command(version, about = "Subscribe to FSDB state and stats through the native bridge", long_about = None)]
pub struct Args {
    /// Client identifier (generated when omitted).
    #[arg(short, long)]
    pub client_id: Option<String>,

    /// FSDB host used in subscription keys.
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// How long each subscribe call waits for its status flag, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_SUBSCRIBE_TIMEOUT_MS)]
    pub subscribe_timeout_ms: u64,

    /// Interval between status flag reads, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,

    /// Subscription latency of the loopback bridge, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_LOOPBACK_LATENCY_MS)]
    pub loopback_latency_ms: u64,

    /// Exit after reporting status.
    #[arg(long)]
    pub once: bool,

    /// Print the status report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Convert command-line arguments to demo configuration.
    pub fn into_config(self) -> DemoConfig {
        let client_id = self.client_id.unwrap_or_else(generate_client_id);
        let client = ClientConfig::new(client_id)
            .with_host(self.host)
            .with_subscribe_timeout(Duration::from_millis(self.subscribe_timeout_ms))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms));

        DemoConfig {
            client,
            loopback_latency: Duration::from_millis(self.loopback_latency_ms),
            once: self.once,
            json: self.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let config = Args::try_parse_from(["fsdb-demo"]).unwrap().into_config();

        assert!(config.client.client_id.starts_with("fsdb-client-"));
        assert_eq!(config.client.host, DEFAULT_HOST);
        assert_eq!(
            config.client.subscribe_timeout,
            Duration::from_millis(DEFAULT_SUBSCRIBE_TIMEOUT_MS)
        );
        assert_eq!(
            config.loopback_latency,
            Duration::from_millis(DEFAULT_LOOPBACK_LATENCY_MS)
        );
        assert!(!config.once);
        assert!(!config.json);
    }

    #[test]
    fn test_explicit_args() {
        let config = Args::try_parse_from([
            "fsdb-demo",
            "--client-id",
            "lldp-agent",
            "--host",
            "fsdb.lab",
            "--subscribe-timeout-ms",
            "0",
            "--poll-interval-ms",
            "10",
            "--once",
            "--json",
        ])
        .unwrap()
        .into_config();

        assert_eq!(config.client.client_id, "lldp-agent");
        assert_eq!(config.client.host, "fsdb.lab");
        assert_eq!(config.client.subscribe_timeout, Duration::ZERO);
        assert_eq!(config.client.poll_interval, Duration::from_millis(10));
        assert!(config.once);
        assert!(config.json);
    }
}
