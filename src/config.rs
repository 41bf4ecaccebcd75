//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_MAX_CACHE_BYTES;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub listen_addr: String,
    /// Identity announced on the ring, when it differs from the bound address
    pub advertise_addr: Option<String>,
    /// Byte budget of the local store
    pub max_cache_bytes: u64,
    /// Initial peer set; the node itself is used when empty
    pub peers: Vec<String>,
    /// Ring positions per peer
    pub ring_replicas: usize,
    /// Upper bound on a forwarded transaction round trip, in milliseconds
    pub forward_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LISTEN_ADDR` - Listener address (default: 127.0.0.1:3000)
    /// - `ADVERTISE_ADDR` - Ring identity override (default: bound address)
    /// - `MAX_CACHE_BYTES` - Store byte budget (default: 256 MiB)
    /// - `PEERS` - Comma separated initial peer set (default: empty)
    /// - `RING_REPLICAS` - Ring positions per peer (default: 1)
    /// - `FORWARD_TIMEOUT_MS` - Forwarding timeout (default: 5000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_addr: env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            advertise_addr: env::var("ADVERTISE_ADDR")
                .ok()
                .filter(|addr| !addr.trim().is_empty()),
            max_cache_bytes: env::var("MAX_CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_cache_bytes),
            peers: env::var("PEERS")
                .map(|v| parse_peer_list(&v))
                .unwrap_or_default(),
            ring_replicas: env::var("RING_REPLICAS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&replicas| replicas > 0)
                .unwrap_or(defaults.ring_replicas),
            forward_timeout_ms: env::var("FORWARD_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.forward_timeout_ms),
        }
    }

    pub fn forward_timeout(&self) -> Duration {
        Duration::from_millis(self.forward_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
            advertise_addr: None,
            max_cache_bytes: DEFAULT_MAX_CACHE_BYTES,
            peers: Vec::new(),
            ring_replicas: 1,
            forward_timeout_ms: 5000,
        }
    }
}

/// Splits a comma separated peer list, dropping blanks.
fn parse_peer_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|peer| !peer.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.listen_addr, "127.0.0.1:3000");
        assert_eq!(config.max_cache_bytes, 256 * 1024 * 1024);
        assert!(config.peers.is_empty());
        assert_eq!(config.ring_replicas, 1);
        assert_eq!(config.forward_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for var in [
            "LISTEN_ADDR",
            "ADVERTISE_ADDR",
            "MAX_CACHE_BYTES",
            "PEERS",
            "RING_REPLICAS",
            "FORWARD_TIMEOUT_MS",
        ] {
            env::remove_var(var);
        }

        let config = Config::from_env();
        assert_eq!(config.listen_addr, "127.0.0.1:3000");
        assert!(config.advertise_addr.is_none());
        assert_eq!(config.max_cache_bytes, DEFAULT_MAX_CACHE_BYTES);
        assert_eq!(config.ring_replicas, 1);
        assert_eq!(config.forward_timeout_ms, 5000);
    }

    #[test]
    fn test_parse_peer_list() {
        assert_eq!(
            parse_peer_list(" 10.0.0.1:7000, ,10.0.0.2:7000,"),
            vec!["10.0.0.1:7000".to_string(), "10.0.0.2:7000".to_string()]
        );
        assert!(parse_peer_list("").is_empty());
    }
}
