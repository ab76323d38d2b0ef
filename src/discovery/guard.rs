//! Role guard: exclusive, idempotent start/stop of the two discovery roles,
//! plus the automatic wiring that drives them from host connection events.

use crate::config::DiscoveryConfig;
use crate::discovery::advertiser::AdvertiseLoop;
use crate::discovery::delivery::PeerSink;
use crate::discovery::searcher::SearchLoop;
use crate::error::DiscoveryError;
use crate::host::{ConnectionEvent, ConnectionState, HostRole, HostStatus};
use crate::transport::{DatagramTransport, UdpTransport};
use log::{error, warn};
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertiserState {
    Idle,
    Advertising,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearcherState {
    Idle,
    Searching,
}

/// Handle to a running role loop. Owned by the guard while the role is
/// active; consumed on stop.
struct RoleTask {
    shutdown: Arc<AtomicBool>,
    wake_port: Arc<Mutex<u16>>,
    handle: JoinHandle<()>,
}

impl RoleTask {
    /// Signal shutdown, unblock any in-flight receive with a zero-length
    /// loopback datagram, and join the loop thread. Returns promptly: worst
    /// case is one read-timeout tick if the wake datagram is lost.
    fn stop(self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let port = *self.wake_port.lock().unwrap();
        let wake = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        if let Ok(sock) = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)) {
            let _ = sock.send_to(&[], wake);
        }
        if self.handle.join().is_err() {
            error!("discovery loop thread panicked");
        }
    }
}

struct AdvertiserSlot {
    state: AdvertiserState,
    task: Option<RoleTask>,
}

struct SearcherSlot {
    state: SearcherState,
    task: Option<RoleTask>,
}

/// The discovery engine's front door.
///
/// At most one advertise loop and one search loop exist per instance, and
/// the two roles are mutually exclusive with the host's own server/client
/// activity. All `start_*` misuse is a logged no-op; only construction and
/// config loading return errors.
pub struct PeerDiscovery {
    config: DiscoveryConfig,
    host: Arc<dyn HostStatus>,
    sink: Arc<dyn PeerSink>,
    advertiser: Mutex<AdvertiserSlot>,
    searcher: Mutex<SearcherSlot>,
}

impl PeerDiscovery {
    pub fn new(
        config: DiscoveryConfig,
        host: Arc<dyn HostStatus>,
        sink: Arc<dyn PeerSink>,
    ) -> Result<Self, DiscoveryError> {
        config.validate()?;
        Ok(PeerDiscovery {
            config,
            host,
            sink,
            advertiser: Mutex::new(AdvertiserSlot {
                state: AdvertiserState::Idle,
                task: None,
            }),
            searcher: Mutex::new(SearcherSlot {
                state: SearcherState::Idle,
                task: None,
            }),
        })
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn advertiser_state(&self) -> AdvertiserState {
        self.advertiser.lock().unwrap().state
    }

    pub fn searcher_state(&self) -> SearcherState {
        self.searcher.lock().unwrap().state
    }

    /// Begin answering probes. No-op (with a warning) unless the host is
    /// running a server, the role is idle, and the discovery port does not
    /// collide with the host's primary transport port. Bind failure is
    /// logged and leaves the role idle.
    pub fn start_advertising(&self) {
        let mut slot = self.advertiser.lock().unwrap();
        if slot.state == AdvertiserState::Advertising {
            warn!("start_advertising ignored: already advertising");
            return;
        }
        if !self.host.is_server_active() {
            warn!("start_advertising ignored: host is not running a server");
            return;
        }
        if self.config.port == self.host.primary_transport_port() {
            warn!(
                "start_advertising ignored: discovery port {} collides with primary transport port",
                self.config.port
            );
            return;
        }

        let transport =
            match UdpTransport::bind_advertiser(self.config.port, self.config.timeout()) {
                Ok(t) => t,
                Err(e) => {
                    error!("failed to bind discovery port {}: {}", self.config.port, e);
                    return;
                }
            };

        let shutdown = Arc::new(AtomicBool::new(false));
        let wake_port = Arc::new(Mutex::new(self.config.port));
        let run = AdvertiseLoop::new(self.config.clone(), Arc::clone(&shutdown));
        let handle = match thread::Builder::new()
            .name("lanscout-advertise".into())
            .spawn(move || run.run(transport))
        {
            Ok(h) => h,
            Err(e) => {
                error!("failed to spawn advertise thread: {}", e);
                return;
            }
        };

        slot.state = AdvertiserState::Advertising;
        slot.task = Some(RoleTask {
            shutdown,
            wake_port,
            handle,
        });
    }

    /// Stop answering probes. Idempotent; safe to call from teardown paths.
    pub fn stop_advertising(&self) {
        let task = {
            let mut slot = self.advertiser.lock().unwrap();
            if slot.state == AdvertiserState::Idle {
                return;
            }
            slot.state = AdvertiserState::Idle;
            slot.task.take()
        };
        if let Some(task) = task {
            task.stop();
        }
    }

    /// Begin probing for advertisers. No-op (with a warning) while the host
    /// is a server or a connected client, or when already searching. Each
    /// session starts with an empty duplicate-suppression set.
    pub fn start_searching(&self) {
        let mut slot = self.searcher.lock().unwrap();
        if slot.state == SearcherState::Searching {
            warn!("start_searching ignored: already searching");
            return;
        }
        if self.host.is_server_active() {
            warn!("start_searching ignored: host is running a server");
            return;
        }
        if self.host.is_client_active() {
            warn!("start_searching ignored: host is connected as a client");
            return;
        }

        let transport = match UdpTransport::bind_searcher(self.config.timeout()) {
            Ok(t) => t,
            Err(e) => {
                error!("failed to bind search socket: {}", e);
                return;
            }
        };
        let local_port = match transport.local_addr() {
            Ok(addr) => addr.port(),
            Err(e) => {
                error!("failed to read search socket address: {}", e);
                return;
            }
        };

        let shutdown = Arc::new(AtomicBool::new(false));
        let wake_port = Arc::new(Mutex::new(local_port));
        let run = SearchLoop::new(
            self.config.clone(),
            Arc::clone(&shutdown),
            Arc::clone(&wake_port),
            Arc::clone(&self.sink),
        );
        let handle = match thread::Builder::new()
            .name("lanscout-search".into())
            .spawn(move || run.run(transport))
        {
            Ok(h) => h,
            Err(e) => {
                error!("failed to spawn search thread: {}", e);
                return;
            }
        };

        slot.state = SearcherState::Searching;
        slot.task = Some(RoleTask {
            shutdown,
            wake_port,
            handle,
        });
    }

    /// Stop probing. Idempotent; safe to call from teardown paths.
    pub fn stop_searching(&self) {
        let task = {
            let mut slot = self.searcher.lock().unwrap();
            if slot.state == SearcherState::Idle {
                return;
            }
            slot.state = SearcherState::Idle;
            slot.task.take()
        };
        if let Some(task) = task {
            task.stop();
        }
    }

    /// Automatic-mode adapter over host connection transitions:
    /// server started -> advertise, server stopped -> search,
    /// client connected -> stop searching, client disconnected -> search.
    /// Ignored entirely unless `automatic` is set in the config;
    /// `Starting`/`Stopping` are observed but drive nothing.
    pub fn handle_connection_event(&self, event: ConnectionEvent) {
        if !self.config.automatic {
            return;
        }
        match (event.role, event.state) {
            (HostRole::Server, ConnectionState::Started) => {
                self.stop_searching();
                self.start_advertising();
            }
            (HostRole::Server, ConnectionState::Stopped) => {
                self.stop_advertising();
                self.start_searching();
            }
            (HostRole::Client, ConnectionState::Started) => {
                self.stop_searching();
            }
            (HostRole::Client, ConnectionState::Stopped) => {
                self.start_searching();
            }
            _ => {}
        }
    }

    /// Drain host connection events from a channel on a dedicated thread,
    /// applying the automatic-mode mapping for each. The thread exits when
    /// the sender side is dropped.
    pub fn spawn_event_listener(
        self: &Arc<Self>,
        events: mpsc::Receiver<ConnectionEvent>,
    ) -> std::io::Result<JoinHandle<()>> {
        let guard = Arc::clone(self);
        thread::Builder::new()
            .name("lanscout-events".into())
            .spawn(move || {
                for event in events {
                    guard.handle_connection_event(event);
                }
            })
    }
}

impl Drop for PeerDiscovery {
    fn drop(&mut self) {
        self.stop_advertising();
        self.stop_searching();
    }
}
