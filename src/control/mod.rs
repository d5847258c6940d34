//! Control connection
//!
//! The command channel shared by every data stream of a session: reply
//! round trips, the multi-command lock and the server capability set.

pub mod capabilities;
pub mod channel;
pub mod connection;
pub mod lock;

pub use capabilities::{Capabilities, Capability};
pub use channel::ControlChannel;
pub use connection::FtpControlConnection;
pub use lock::{ControlLock, ControlLockGuard};
