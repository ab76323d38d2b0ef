//! Advertise loop: answer validated probes with the fixed acknowledgment.

use crate::config::DiscoveryConfig;
use crate::protocol;
use crate::transport::{DatagramTransport, UdpTransport};
use log::{debug, error, info, warn};
use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub(crate) struct AdvertiseLoop {
    config: DiscoveryConfig,
    shutdown: Arc<AtomicBool>,
}

impl AdvertiseLoop {
    pub(crate) fn new(config: DiscoveryConfig, shutdown: Arc<AtomicBool>) -> Self {
        AdvertiseLoop { config, shutdown }
    }

    /// Run until the shutdown flag is observed or an unrecoverable socket
    /// error occurs. The guard binds the initial socket so bind failures
    /// fail `start_advertising` synchronously; this loop only rebinds on
    /// receive timeout.
    pub(crate) fn run(self, mut transport: UdpTransport) {
        let ack = protocol::encode_ack();
        // One byte larger than the longest acceptable probe, so an
        // oversized datagram reads as over-length and fails validation
        // instead of silently truncating into a match.
        let mut buf = [0u8; protocol::MAX_PROBE_LEN + 1];

        info!("advertising on udp port {}", self.config.port);

        while !self.shutdown.load(Ordering::SeqCst) {
            match transport.receive(&mut buf) {
                // Zero-length datagrams are the wake signal (or noise).
                Ok((0, _)) => continue,
                Ok((len, src)) => {
                    if protocol::is_valid_probe(&buf[..len], &self.config.secret) {
                        match transport.send_to(&ack, src) {
                            Ok(_) => debug!("acknowledged probe from {}", src),
                            Err(e) => warn!("failed to acknowledge {}: {}", src, e),
                        }
                    } else {
                        warn!("dropping unrecognized probe from {}", src);
                    }
                }
                Err(ref e)
                    if e.kind() == ErrorKind::WouldBlock
                        || e.kind() == ErrorKind::TimedOut =>
                {
                    // Steady-state quiet network. Reset the socket before
                    // waiting again.
                    match UdpTransport::bind_advertiser(
                        self.config.port,
                        self.config.timeout(),
                    ) {
                        Ok(t) => transport = t,
                        Err(e) => {
                            error!(
                                "failed to rebind discovery port {}: {}",
                                self.config.port, e
                            );
                            break;
                        }
                    }
                }
                Err(e) => {
                    error!("advertise receive failed: {}", e);
                    break;
                }
            }
        }

        info!("advertise loop stopped");
    }
}
