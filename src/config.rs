//! Discovery configuration.
//!
//! All timing values are in milliseconds. Zero durations are coerced up to
//! 1 ms by the accessors rather than rejected, so a sloppy config still
//! yields a bounded receive instead of an infinite block.

use crate::error::DiscoveryError;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DiscoveryConfig {
    /// Shared secret carried in every probe. Advertiser and searcher must
    /// agree on it; must be non-empty.
    pub secret: String,
    /// Well-known UDP discovery port. Must differ from the host's primary
    /// transport port for advertising to start.
    pub port: u16,
    /// Upper bound on a single blocking receive (ms, default: 2000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Delay between successive probe broadcasts (ms, default: 1000).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Address probes are broadcast to (default: 255.255.255.255).
    /// Tests and point-to-point setups can set this to 127.0.0.1.
    #[serde(default = "default_broadcast_addr")]
    pub broadcast_addr: IpAddr,
    /// When set, the role guard drives roles from host connection events.
    #[serde(default)]
    pub automatic: bool,
}

fn default_timeout_ms() -> u64 {
    2000
}
fn default_interval_ms() -> u64 {
    1000
}
fn default_broadcast_addr() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::BROADCAST)
}

impl DiscoveryConfig {
    pub fn new(secret: impl Into<String>, port: u16) -> Self {
        DiscoveryConfig {
            secret: secret.into(),
            port,
            timeout_ms: default_timeout_ms(),
            interval_ms: default_interval_ms(),
            broadcast_addr: default_broadcast_addr(),
            automatic: false,
        }
    }

    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DiscoveryError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: DiscoveryConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if self.secret.is_empty() {
            return Err(DiscoveryError::EmptySecret);
        }
        if self.port == 0 {
            return Err(DiscoveryError::InvalidPort);
        }
        Ok(())
    }

    /// Receive bound, floored at 1 ms.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    /// Broadcast interval, floored at 1 ms.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        let config = DiscoveryConfig::new("", 7777);
        assert!(matches!(
            config.validate(),
            Err(DiscoveryError::EmptySecret)
        ));
    }

    #[test]
    fn test_zero_port_rejected() {
        let config = DiscoveryConfig::new("game-v1", 0);
        assert!(matches!(config.validate(), Err(DiscoveryError::InvalidPort)));
    }

    #[test]
    fn test_zero_durations_coerced() {
        let mut config = DiscoveryConfig::new("game-v1", 7777);
        config.timeout_ms = 0;
        config.interval_ms = 0;
        assert_eq!(config.timeout(), Duration::from_millis(1));
        assert_eq!(config.interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{ "secret": "game-v1", "port": 7777 }"#;
        let config: DiscoveryConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout_ms, 2000);
        assert_eq!(config.interval_ms, 1000);
        assert_eq!(
            config.broadcast_addr,
            "255.255.255.255".parse::<IpAddr>().unwrap()
        );
        assert!(!config.automatic);
    }
}
