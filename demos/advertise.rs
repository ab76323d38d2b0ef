//! Demo advertiser: pretends to host a server and answers discovery probes
//! until Ctrl-C.
//!
//! Run with a searcher on the same machine or segment:
//!   RUST_LOG=debug cargo run --bin advertise -- game-v1 7777

use lanscout::{CallbackSink, DiscoveredPeer, DiscoveryConfig, HostStatus, PeerDiscovery};
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

struct DemoHost {
    transport_port: u16,
}

impl HostStatus for DemoHost {
    fn is_server_active(&self) -> bool {
        true
    }
    fn is_client_active(&self) -> bool {
        false
    }
    fn primary_transport_port(&self) -> u16 {
        self.transport_port
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let secret = args.get(1).cloned().unwrap_or_else(|| "game-v1".into());
    let port: u16 = args
        .get(2)
        .and_then(|p| p.parse().ok())
        .unwrap_or(7777);

    let config = DiscoveryConfig::new(secret, port);
    let host = Arc::new(DemoHost {
        transport_port: port + 1,
    });
    // The advertiser never receives peers; the sink is unused here.
    let sink = Arc::new(CallbackSink(|_peer: DiscoveredPeer| {}));

    let discovery = PeerDiscovery::new(config, host, sink).expect("invalid config");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .ok();

    discovery.start_advertising();
    println!("Advertising on udp port {} (Ctrl-C to stop)", port);

    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(200));
    }

    discovery.stop_advertising();
    println!("Stopped.");
}
