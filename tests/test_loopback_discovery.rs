/// End-to-end discovery tests over loopback UDP.
///
/// Both roles run inside one process: an advertiser guard bound on a test
/// port and a searcher guard whose broadcast address is pointed at
/// 127.0.0.1, so real datagrams flow without touching the network.
use lanscout::{
    AdvertiserState, DiscoveredPeer, DiscoveryConfig, HostStatus, PeerDiscovery, SearcherState,
};
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

struct FakeHost {
    server: bool,
    client: bool,
    transport_port: u16,
}

impl HostStatus for FakeHost {
    fn is_server_active(&self) -> bool {
        self.server
    }
    fn is_client_active(&self) -> bool {
        self.client
    }
    fn primary_transport_port(&self) -> u16 {
        self.transport_port
    }
}

struct NullSink;
impl lanscout::PeerSink for NullSink {
    fn peer_found(&self, _peer: DiscoveredPeer) {}
}

fn test_config(secret: &str, port: u16) -> DiscoveryConfig {
    let mut config = DiscoveryConfig::new(secret, port);
    config.timeout_ms = 300;
    config.interval_ms = 30;
    config.broadcast_addr = "127.0.0.1".parse().unwrap();
    config
}

fn advertiser_guard(secret: &str, port: u16) -> PeerDiscovery {
    let host = Arc::new(FakeHost {
        server: true,
        client: false,
        transport_port: port + 1,
    });
    PeerDiscovery::new(test_config(secret, port), host, Arc::new(NullSink)).unwrap()
}

fn searcher_guard(
    secret: &str,
    port: u16,
) -> (PeerDiscovery, mpsc::Receiver<DiscoveredPeer>) {
    let host = Arc::new(FakeHost {
        server: false,
        client: false,
        transport_port: 0,
    });
    let (tx, rx) = mpsc::channel();
    let guard = PeerDiscovery::new(test_config(secret, port), host, Arc::new(tx)).unwrap();
    (guard, rx)
}

#[test]
fn test_probe_ack_round_trip() {
    let port = 40731;
    let advertiser = advertiser_guard("game-v1", port);
    advertiser.start_advertising();
    assert_eq!(advertiser.advertiser_state(), AdvertiserState::Advertising);

    let (searcher, rx) = searcher_guard("game-v1", port);
    searcher.start_searching();

    // Discovery bound: timeout + interval, with generous slack for CI.
    let peer = rx
        .recv_timeout(Duration::from_secs(3))
        .expect("no peer discovered within the timeout+interval bound");
    assert_eq!(peer.address, "127.0.0.1".parse::<std::net::IpAddr>().unwrap());
    assert_eq!(peer.port, port, "peer port must match the advertiser's bound port");

    searcher.stop_searching();
    advertiser.stop_advertising();
    assert_eq!(searcher.searcher_state(), SearcherState::Idle);
    assert_eq!(advertiser.advertiser_state(), AdvertiserState::Idle);
}

#[test]
fn test_wrong_secret_is_never_acknowledged() {
    let port = 40732;
    let advertiser = advertiser_guard("game-v1", port);
    advertiser.start_advertising();

    let (searcher, rx) = searcher_guard("wrong", port);
    searcher.start_searching();

    // Several broadcast cycles worth of silence.
    thread::sleep(Duration::from_millis(600));
    assert!(
        rx.try_recv().is_err(),
        "advertiser acknowledged a probe with the wrong secret"
    );
    assert_eq!(advertiser.advertiser_state(), AdvertiserState::Advertising);
    assert_eq!(searcher.searcher_state(), SearcherState::Searching);

    searcher.stop_searching();
    advertiser.stop_advertising();
}

#[test]
fn test_searcher_with_no_advertiser_keeps_running() {
    let port = 40733;
    let (searcher, rx) = searcher_guard("game-v1", port);
    searcher.start_searching();

    // Long enough for multiple receive timeouts and socket resets.
    thread::sleep(Duration::from_millis(800));
    assert!(rx.try_recv().is_err(), "phantom peer reported");
    assert_eq!(searcher.searcher_state(), SearcherState::Searching);

    searcher.stop_searching();
    assert_eq!(searcher.searcher_state(), SearcherState::Idle);
}

#[test]
fn test_duplicate_acknowledgments_reported_once() {
    let port = 40734;

    // A responder that answers every probe with a burst of acknowledgments,
    // simulating the same advertiser being heard N times.
    let responder = UdpSocket::bind(("127.0.0.1", port)).unwrap();
    responder
        .set_read_timeout(Some(Duration::from_millis(100)))
        .unwrap();
    let stop = Arc::new(AtomicBool::new(false));
    let stop_responder = stop.clone();
    let responder_thread = thread::spawn(move || {
        let mut buf = [0u8; 64];
        while !stop_responder.load(Ordering::SeqCst) {
            if let Ok((len, src)) = responder.recv_from(&mut buf) {
                if &buf[..len] == b"game-v1" {
                    for _ in 0..3 {
                        responder.send_to(&[0x01], src).unwrap();
                    }
                }
            }
        }
    });

    let (searcher, rx) = searcher_guard("game-v1", port);
    searcher.start_searching();

    let first = rx
        .recv_timeout(Duration::from_secs(3))
        .expect("responder was never discovered");
    assert_eq!(first.port, port);

    // Keep listening: the duplicates must be suppressed for the session.
    let deadline = Instant::now() + Duration::from_millis(800);
    while Instant::now() < deadline {
        assert!(
            rx.try_recv().is_err(),
            "duplicate peer delivered in the same session"
        );
        thread::sleep(Duration::from_millis(50));
    }

    searcher.stop_searching();
    stop.store(true, Ordering::SeqCst);
    responder_thread.join().unwrap();
}

#[test]
fn test_stop_returns_promptly_with_no_traffic() {
    let port = 40735;
    let advertiser = advertiser_guard("game-v1", port);
    advertiser.start_advertising();

    let started = Instant::now();
    advertiser.stop_advertising();
    // The wake datagram should unblock the receive well before the 300 ms
    // read timeout expires; allow one full tick plus slack.
    assert!(
        started.elapsed() < Duration::from_millis(700),
        "stop_advertising blocked for {:?}",
        started.elapsed()
    );
    assert_eq!(advertiser.advertiser_state(), AdvertiserState::Idle);
}
