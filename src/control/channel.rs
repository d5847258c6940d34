//! Module `channel`
//!
//! The interface the data channel negotiator needs from a control connection.

use std::net::SocketAddr;

use crate::control::Capability;
use crate::error::FtpClientError;
use crate::protocol::FtpReply;

/// A control connection shared between the data streams of one session.
///
/// Implementations serialise individual command round trips internally.
/// Callers that need several commands to run back to back hold the control
/// lock around them; the lock is not reentrant.
pub trait ControlChannel {
    /// Sends one command and reads its complete reply.
    fn execute(&self, command: &str) -> Result<FtpReply, FtpClientError>;

    fn lock_control_connection(&self);

    fn unlock_control_connection(&self);

    /// Forgets that the server supports `capability`. Affects every later
    /// decision made on this connection.
    fn remove_capability(&self, capability: Capability);

    fn has_capability(&self, capability: Capability) -> bool;

    /// Local address of the control connection socket.
    fn local_endpoint(&self) -> Result<SocketAddr, FtpClientError>;
}
