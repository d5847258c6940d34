//! FTP Protocol implementation
//!
//! Handles reply parsing, reply codes and command formatting.

pub mod commands;
pub mod reply;
pub mod responses;

pub use commands::{format_eprt, format_port};
pub use reply::{FtpReply, ReplyClass, read_reply};
