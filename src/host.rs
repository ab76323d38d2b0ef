//! Host application collaborator interface.
//!
//! The discovery engine never manages connections itself; it asks the host
//! what it is currently doing (via [`HostStatus`]) and, in automatic mode,
//! reacts to its connection-state transitions (via [`ConnectionEvent`]).

/// Snapshot queries against the host application's networking state.
///
/// Implementations must be callable from the guard's control context and
/// from the event-listener thread, hence `Send + Sync`.
pub trait HostStatus: Send + Sync {
    /// True while the host is running its own server.
    fn is_server_active(&self) -> bool;

    /// True while the host is connected to a remote server as a client.
    fn is_client_active(&self) -> bool;

    /// The host's primary transport port. The discovery port must not
    /// collide with it.
    fn primary_transport_port(&self) -> u16;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRole {
    Server,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Starting,
    Started,
    Stopping,
    Stopped,
}

/// A host connection-state transition, fed to the role guard in
/// automatic mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionEvent {
    pub role: HostRole,
    pub state: ConnectionState,
}

impl ConnectionEvent {
    pub fn new(role: HostRole, state: ConnectionState) -> Self {
        ConnectionEvent { role, state }
    }
}
