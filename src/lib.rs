//! # lanscout
//!
//! LAN peer discovery over UDP broadcast with a shared-secret handshake.
//!
//! A process hosting a server advertises itself by answering broadcast
//! probes; a process looking for servers broadcasts probes and collects the
//! acknowledgment senders. [`PeerDiscovery`] guards the two roles so only
//! one is active per instance, and hands discovered peers to the consumer
//! through a [`PeerSink`].
//!
//! ## Lifecycle
//!
//! 1. Build a config: `DiscoveryConfig::new("game-v1", 7777)` or
//!    `DiscoveryConfig::load("discovery.json")`
//! 2. Construct the guard: `PeerDiscovery::new(config, host, sink)`
//! 3. Drive roles manually (`start_advertising` / `start_searching`), or set
//!    `automatic` and feed host [`ConnectionEvent`]s through
//!    `spawn_event_listener`
//! 4. Stop from any teardown path: `stop_advertising` / `stop_searching`
//!    (both idempotent; also run on drop)

pub mod config;
pub mod discovery;
pub mod error;
pub mod host;
pub mod protocol;
pub mod transport;

pub use config::DiscoveryConfig;
pub use discovery::{
    AdvertiserState, CallbackSink, DiscoveredPeer, PeerDiscovery, PeerSink, SearcherState,
};
pub use error::DiscoveryError;
pub use host::{ConnectionEvent, ConnectionState, HostRole, HostStatus};
pub use transport::{DatagramTransport, UdpTransport};
