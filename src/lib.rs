pub mod config;
pub mod control;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transfer;
pub mod utils;

pub use config::ClientConfig;
pub use control::{ControlChannel, FtpControlConnection};
pub use error::FtpClientError;
pub use transfer::{ActiveStream, DataChannelType};
