//! Search loop: broadcast probes, collect unique acknowledgment senders.
//!
//! Continuous mode: the loop keeps probing and reporting new peers until
//! stopped, suppressing duplicates for the lifetime of the session. It never
//! self-terminates on the first hit, so consumers can list every advertiser
//! on the segment.

use crate::config::DiscoveryConfig;
use crate::discovery::delivery::{DiscoveredPeer, PeerSink};
use crate::protocol;
use crate::transport::{DatagramTransport, UdpTransport};
use log::{error, info, warn};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

pub(crate) struct SearchLoop {
    config: DiscoveryConfig,
    shutdown: Arc<AtomicBool>,
    /// Current local port of the search socket, kept fresh across rebinds so
    /// the guard can aim its wake datagram at an ephemeral port.
    wake_port: Arc<Mutex<u16>>,
    sink: Arc<dyn PeerSink>,
}

impl SearchLoop {
    pub(crate) fn new(
        config: DiscoveryConfig,
        shutdown: Arc<AtomicBool>,
        wake_port: Arc<Mutex<u16>>,
        sink: Arc<dyn PeerSink>,
    ) -> Self {
        SearchLoop {
            config,
            shutdown,
            wake_port,
            sink,
        }
    }

    pub(crate) fn run(self, mut transport: UdpTransport) {
        let target = SocketAddr::new(self.config.broadcast_addr, self.config.port);
        // The session's deduplication set lives here, so a new session
        // always starts empty.
        let mut seen: HashSet<SocketAddr> = HashSet::new();
        let mut buf = [0u8; 16];

        info!("searching for peers via {}", target);

        while !self.shutdown.load(Ordering::SeqCst) {
            thread::sleep(self.config.interval());
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            if let Err(e) = transport.send_to(protocol::encode_probe(&self.config.secret), target)
            {
                warn!("probe broadcast to {} failed: {}", target, e);
            }

            match transport.receive(&mut buf) {
                // Wake signal or empty noise.
                Ok((0, _)) => continue,
                Ok((len, src)) => {
                    if protocol::is_valid_ack(&buf[..len]) {
                        if seen.insert(src) {
                            let peer = DiscoveredPeer::from_addr(src);
                            info!("discovered peer {}", peer);
                            self.sink.peer_found(peer);
                        }
                    } else {
                        warn!("dropping malformed acknowledgment from {}", src);
                    }
                }
                Err(ref e)
                    if e.kind() == ErrorKind::WouldBlock
                        || e.kind() == ErrorKind::TimedOut =>
                {
                    // No answer this round. Reset the socket and probe again.
                    match UdpTransport::bind_searcher(self.config.timeout()) {
                        Ok(t) => {
                            if let Ok(addr) = t.local_addr() {
                                *self.wake_port.lock().unwrap() = addr.port();
                            }
                            transport = t;
                        }
                        Err(e) => {
                            error!("failed to rebind search socket: {}", e);
                            break;
                        }
                    }
                }
                Err(e) => {
                    error!("search receive failed: {}", e);
                    break;
                }
            }
        }

        info!("search loop stopped");
    }
}
