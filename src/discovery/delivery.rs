//! Hand-off of discovered peers to the consumer.
//!
//! The search loop runs on a background thread, so delivery is abstracted
//! behind [`PeerSink`]. The `mpsc::Sender` implementation is the marshalling
//! form: the consumer drains the receiver on whatever context it needs
//! affinity to (a UI/main loop, typically). [`CallbackSink`] invokes the
//! closure directly on the search thread and is meant for consumers with no
//! affinity requirement.

use log::debug;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::mpsc;

/// An endpoint that answered a probe with a valid acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscoveredPeer {
    pub address: IpAddr,
    pub port: u16,
}

impl DiscoveredPeer {
    pub fn from_addr(addr: SocketAddr) -> Self {
        DiscoveredPeer {
            address: addr.ip(),
            port: addr.port(),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl fmt::Display for DiscoveredPeer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Consumer-side sink for discovered peers.
///
/// `peer_found` is invoked from the search thread, once per unique peer per
/// search session.
pub trait PeerSink: Send + Sync {
    fn peer_found(&self, peer: DiscoveredPeer);
}

impl PeerSink for mpsc::Sender<DiscoveredPeer> {
    fn peer_found(&self, peer: DiscoveredPeer) {
        if self.send(peer).is_err() {
            // Receiver is gone; discovery keeps running regardless.
            debug!("peer delivery channel closed, dropping {}", peer);
        }
    }
}

/// Wraps a closure as a [`PeerSink`]. The closure runs on the search thread.
pub struct CallbackSink<F>(pub F);

impl<F> PeerSink for CallbackSink<F>
where
    F: Fn(DiscoveredPeer) + Send + Sync,
{
    fn peer_found(&self, peer: DiscoveredPeer) {
        (self.0)(peer)
    }
}
