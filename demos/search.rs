//! Demo searcher: broadcasts probes and prints every advertiser found until
//! Ctrl-C.
//!
//!   RUST_LOG=debug cargo run --bin search -- game-v1 7777

use lanscout::{DiscoveryConfig, HostStatus, PeerDiscovery};
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

struct DemoHost;

impl HostStatus for DemoHost {
    fn is_server_active(&self) -> bool {
        false
    }
    fn is_client_active(&self) -> bool {
        false
    }
    fn primary_transport_port(&self) -> u16 {
        0
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

    // Channel delivery: peers are reported on the search thread and drained
    // here on the main thread.
    let (tx, rx) = mpsc::channel();
    let discovery =
        PeerDiscovery::new(config, Arc::new(DemoHost), Arc::new(tx)).expect("invalid config");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .ok();

    discovery.start_searching();
    println!("Searching on udp port {} (Ctrl-C to stop)", port);

    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(peer) => println!("Found server at {}", peer),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    discovery.stop_searching();
    println!("Stopped.");
}
