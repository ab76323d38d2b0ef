use super::traits::DatagramTransport;
use socket2::{Domain, Protocol, Socket, Type};
use std::io::Result;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::time::Duration;

pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind the advertiser socket on the well-known discovery port.
    ///
    /// SO_REUSEADDR is set before binding so a quick stop/start cycle does
    /// not trip over a port still in TIME_WAIT-adjacent state, and a read
    /// timeout bounds every receive.
    pub fn bind_advertiser(port: u16, read_timeout: Duration) -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port));
        socket.bind(&addr.into())?;
        let socket: UdpSocket = socket.into();
        socket.set_read_timeout(Some(read_timeout))?;
        Ok(UdpTransport { socket })
    }

    /// Bind the searcher socket on an ephemeral port with SO_BROADCAST set,
    /// so probes can go to the broadcast address.
    pub fn bind_searcher(read_timeout: Duration) -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_broadcast(true)?;
        let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));
        socket.bind(&addr.into())?;
        let socket: UdpSocket = socket.into();
        socket.set_read_timeout(Some(read_timeout))?;
        Ok(UdpTransport { socket })
    }
}

impl DatagramTransport for UdpTransport {
    fn send_to(&self, data: &[u8], destination: SocketAddr) -> Result<usize> {
        self.socket.send_to(data, destination)
    }

    fn receive(&self, buffer: &mut [u8]) -> Result<(usize, SocketAddr)> {
        self.socket.recv_from(buffer)
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_advertiser_bind_and_timeout() {
        let transport =
            UdpTransport::bind_advertiser(0, Duration::from_millis(20)).unwrap();
        let mut buf = [0u8; 16];
        let err = transport.receive(&mut buf).unwrap_err();
        assert!(
            err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut,
            "unexpected error kind: {:?}",
            err.kind()
        );
    }

    #[test]
    fn test_searcher_reaches_advertiser() {
        let advertiser =
            UdpTransport::bind_advertiser(0, Duration::from_millis(500)).unwrap();
        let port = advertiser.local_addr().unwrap().port();

        let searcher =
            UdpTransport::bind_searcher(Duration::from_millis(500)).unwrap();
        let dest: SocketAddr = format!("127.0.0.1:{}", port).parse().unwrap();
        searcher.send_to(b"probe", dest).unwrap();

        let mut buf = [0u8; 16];
        let (len, src) = advertiser.receive(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"probe");
        assert_eq!(src.port(), searcher.local_addr().unwrap().port());
    }
}
