//! Transfer module for the FTP client
//!
//! Handles the client side of the data channel: the listening socket and the
//! active-mode handshake that turns it into a connected data stream.

pub mod active;
pub mod data_socket;
pub mod modes;
pub mod results;

// Re-export key types and functions
pub use active::{ActiveStream, ActiveStreamBuilder, negotiate_channel};
pub use data_socket::{DataSocket, DataSocketState, TcpDataSocket};
pub use modes::DataChannelType;
pub use results::{ChannelSetup, SetupCommand};
