//! Module `connection`
//!
//! Blocking control connection to an FTP server: greeting, login, FEAT and
//! single command round trips. Implements [`ControlChannel`] so data streams
//! can share it.

use log::{debug, info, warn};
use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::{Mutex, MutexGuard};

use crate::config::ClientConfig;
use crate::control::{Capabilities, Capability, ControlChannel, ControlLock};
use crate::error::{FtpClientError, ProtocolError};
use crate::protocol::commands::redact;
use crate::protocol::{FtpReply, read_reply, responses};
use crate::utils::validation::is_valid_command;

struct ControlStream {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

/// An open control connection.
pub struct FtpControlConnection {
    stream: Mutex<ControlStream>,
    lock: ControlLock,
    capabilities: Mutex<Capabilities>,
    local_addr: SocketAddr,
    peer_addr: SocketAddr,
}

impl FtpControlConnection {
    /// Connects to the configured server and consumes the 220 greeting.
    pub fn connect(config: &ClientConfig) -> Result<Self, FtpClientError> {
        let target = config.control_socket();
        let addr = target.to_socket_addrs()?.next().ok_or_else(|| {
            FtpClientError::ConfigError(format!("{} did not resolve to an address", target))
        })?;

        let stream = TcpStream::connect_timeout(&addr, config.connect_timeout())?;
        stream.set_read_timeout(config.reply_timeout())?;
        let connection = Self::from_stream(stream)?;

        let greeting = connection.read_reply()?;
        if greeting.code() != responses::READY {
            return Err(ProtocolError::UnexpectedReply {
                expected: responses::READY,
                reply: greeting,
            }
            .into());
        }

        info!(
            "Connected to {} from {}",
            connection.peer_addr, connection.local_addr
        );
        Ok(connection)
    }

    /// Wraps an already connected stream. The greeting is not read.
    pub fn from_stream(stream: TcpStream) -> Result<Self, FtpClientError> {
        let local_addr = stream.local_addr()?;
        let peer_addr = stream.peer_addr()?;
        let writer = stream.try_clone()?;

        Ok(Self {
            stream: Mutex::new(ControlStream {
                reader: BufReader::new(stream),
                writer,
            }),
            lock: ControlLock::new(),
            capabilities: Mutex::new(Capabilities::default()),
            local_addr,
            peer_addr,
        })
    }

    /// Logs in with USER / PASS.
    pub fn login(&self, username: &str, password: &str) -> Result<(), FtpClientError> {
        let reply = self.execute(&format!("USER {}", username))?;
        let reply = match reply.code() {
            responses::LOGIN_SUCCESS => reply,
            responses::PASSWORD_REQUIRED => self.execute(&format!("PASS {}", password))?,
            _ => return Err(FtpClientError::CommandFailed(reply)),
        };

        if reply.code() != responses::LOGIN_SUCCESS {
            return Err(FtpClientError::CommandFailed(reply));
        }
        info!("Logged in to {} as {}", self.peer_addr, username);
        Ok(())
    }

    /// Asks the server for its feature list and replaces the capability set.
    ///
    /// Servers that do not implement FEAT leave the set empty.
    pub fn load_capabilities(&self) -> Result<Capabilities, FtpClientError> {
        let reply = self.execute("FEAT")?;
        let capabilities = if reply.code() == responses::SYSTEM_STATUS {
            Capabilities::from_feat_reply(reply.message())
        } else {
            warn!("FEAT not supported by {}: {}", self.peer_addr, reply);
            Capabilities::default()
        };

        debug!("Server capabilities: {:?}", capabilities);
        *self.capabilities_mut() = capabilities.clone();
        Ok(capabilities)
    }

    /// Snapshot of the current capability set.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities_mut().clone()
    }

    /// Reads the next reply without sending anything, e.g. the 226 that
    /// follows a data transfer.
    pub fn read_reply(&self) -> Result<FtpReply, FtpClientError> {
        let _turn = self.lock.turn();
        let mut stream = self.stream_mut();
        read_reply(&mut stream.reader)
    }

    pub fn quit(&self) -> Result<FtpReply, FtpClientError> {
        let reply = self.execute("QUIT")?;
        info!("Disconnected from {}", self.peer_addr);
        Ok(reply)
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    fn stream_mut(&self) -> MutexGuard<'_, ControlStream> {
        self.stream
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn capabilities_mut(&self) -> MutexGuard<'_, Capabilities> {
        self.capabilities
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ControlChannel for FtpControlConnection {
    fn execute(&self, command: &str) -> Result<FtpReply, FtpClientError> {
        if !is_valid_command(command) {
            return Err(ProtocolError::MalformedCommand(redact(command).to_string()).into());
        }

        // Waits while another thread holds the control lock.
        let _turn = self.lock.turn();
        let mut stream = self.stream_mut();
        debug!("--> {}", redact(command));
        stream.writer.write_all(command.as_bytes())?;
        stream.writer.write_all(b"\r\n")?;
        stream.writer.flush()?;

        read_reply(&mut stream.reader)
    }

    fn lock_control_connection(&self) {
        self.lock.acquire();
    }

    fn unlock_control_connection(&self) {
        self.lock.release();
    }

    fn remove_capability(&self, capability: Capability) {
        if self.capabilities_mut().remove(capability) {
            info!("Server {} no longer assumed to support {}", self.peer_addr, capability);
        }
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities_mut().contains(capability)
    }

    fn local_endpoint(&self) -> Result<SocketAddr, FtpClientError> {
        Ok(self.local_addr)
    }
}
