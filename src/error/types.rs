//! Error types
//!
//! Defines domain-specific error types for the control channel, the data
//! channel handshake and the client as a whole.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use crate::protocol::FtpReply;
use crate::transfer::DataChannelType;

/// Data channel (transfer) errors
#[derive(Debug)]
pub enum TransferError {
    /// A required collaborator was not supplied.
    InvalidArgument(&'static str),
    /// The active negotiator was asked for a passive-style channel.
    UnsupportedMode(DataChannelType),
    /// The local address cannot be expressed by the setup command.
    UnsupportedAddress(SocketAddr),
    BindFailed(SocketAddr, io::Error),
    ListenerConfigurationFailed(io::Error),
    /// Accept was requested before the socket was listening.
    NotListening,
    AcceptTimeout(Duration),
    AcceptFailed(io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::InvalidArgument(name) => {
                write!(f, "Invalid argument: {} is required", name)
            }
            TransferError::UnsupportedMode(mode) => {
                write!(f, "Active streams do not support {}", mode)
            }
            TransferError::UnsupportedAddress(addr) => {
                write!(f, "Address {} cannot be advertised with PORT", addr)
            }
            TransferError::BindFailed(addr, e) => write!(f, "Failed to bind to {}: {}", addr, e),
            TransferError::ListenerConfigurationFailed(e) => {
                write!(f, "Failed to configure listener: {}", e)
            }
            TransferError::NotListening => write!(f, "Data socket is not listening"),
            TransferError::AcceptTimeout(timeout) => {
                write!(f, "No data connection from server within {:?}", timeout)
            }
            TransferError::AcceptFailed(e) => write!(f, "Failed to accept data connection: {}", e),
        }
    }
}

impl std::error::Error for TransferError {}

/// Control channel protocol errors
#[derive(Debug)]
pub enum ProtocolError {
    MalformedReply(String),
    /// Empty, oversized, or contains CR/LF/NUL.
    MalformedCommand(String),
    UnexpectedEof,
    UnexpectedReply { expected: u16, reply: FtpReply },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MalformedReply(line) => write!(f, "Malformed reply: {:?}", line),
            ProtocolError::MalformedCommand(cmd) => write!(f, "Refusing to send command: {:?}", cmd),
            ProtocolError::UnexpectedEof => write!(f, "Control connection closed by server"),
            ProtocolError::UnexpectedReply { expected, reply } => {
                write!(f, "Expected {} reply, got {}", expected, reply)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

/// General FTP client error that encompasses all error types
#[derive(Debug)]
pub enum FtpClientError {
    Transfer(TransferError),
    Protocol(ProtocolError),
    /// The server answered a command with a non-success reply.
    CommandFailed(FtpReply),
    IoError(io::Error),
    ConfigError(String),
}

impl FtpClientError {
    /// Returns the server reply carried by a command failure, if any.
    pub fn reply(&self) -> Option<&FtpReply> {
        match self {
            FtpClientError::CommandFailed(reply) => Some(reply),
            FtpClientError::Protocol(ProtocolError::UnexpectedReply { reply, .. }) => Some(reply),
            _ => None,
        }
    }
}

impl fmt::Display for FtpClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FtpClientError::Transfer(e) => write!(f, "Transfer error: {}", e),
            FtpClientError::Protocol(e) => write!(f, "Protocol error: {}", e),
            FtpClientError::CommandFailed(reply) => write!(f, "Command failed: {}", reply),
            FtpClientError::IoError(e) => write!(f, "I/O error: {}", e),
            FtpClientError::ConfigError(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for FtpClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FtpClientError::Transfer(e) => Some(e),
            FtpClientError::Protocol(e) => Some(e),
            FtpClientError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransferError> for FtpClientError {
    fn from(error: TransferError) -> Self {
        FtpClientError::Transfer(error)
    }
}

impl From<ProtocolError> for FtpClientError {
    fn from(error: ProtocolError) -> Self {
        FtpClientError::Protocol(error)
    }
}

impl From<io::Error> for FtpClientError {
    fn from(error: io::Error) -> Self {
        FtpClientError::IoError(error)
    }
}

impl From<config::ConfigError> for FtpClientError {
    fn from(error: config::ConfigError) -> Self {
        FtpClientError::ConfigError(error.to_string())
    }
}
