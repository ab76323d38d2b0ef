use thiserror::Error;

/// Errors surfaced by configuration validation and role start-up.
///
/// Failures inside a running discovery loop are never surfaced through this
/// type; they are logged and terminate that loop invocation only.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("secret must not be empty")]
    EmptySecret,

    #[error("discovery port must not be 0")]
    InvalidPort,

    #[error("invalid broadcast address '{0}'")]
    InvalidBroadcastAddr(String),

    #[error("failed to read config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
