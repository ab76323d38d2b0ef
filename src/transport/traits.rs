use std::io::Result;
use std::net::SocketAddr;

/// Trait representing a datagram transport for discovery traffic.
/// Object-safe so tests can substitute a mock for the real UDP socket.
pub trait DatagramTransport: Send + Sync {
    /// Send a datagram to the given destination.
    fn send_to(&self, data: &[u8], destination: SocketAddr) -> Result<usize>;

    /// Receive one datagram, blocking up to the configured read timeout.
    /// Returns the number of bytes read and the source address.
    fn receive(&self, buffer: &mut [u8]) -> Result<(usize, SocketAddr)>;

    /// Get the local socket address.
    fn local_addr(&self) -> Result<SocketAddr>;
}
