//! Network utilities
//!
//! Address helpers for the data channel.

use std::net::SocketAddr;

/// Address the data listener binds to: the control connection's local IP,
/// so the server connects back over the same interface, and port 0 for an
/// OS-assigned ephemeral port.
pub fn listen_address(control_local: SocketAddr) -> SocketAddr {
    SocketAddr::new(control_local.ip(), 0)
}
