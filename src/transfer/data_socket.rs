//! Module `data_socket`
//!
//! The client side data socket: bound and listening until the server
//! connects, then a plain TCP stream for the transfer.

use log::{debug, warn};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::TransferError;

const INITIAL_POLL_MS: u64 = 10;
const MAX_POLL_MS: u64 = 200;

/// Lifecycle of a data socket. `Closed` sockets may be bound again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSocketState {
    Unbound,
    Bound,
    Listening,
    Connected,
    Closed,
}

/// Transport used by a data stream.
pub trait DataSocket: Read + Write {
    /// Binds to `addr`, dropping any previous listener first.
    fn bind(&mut self, addr: SocketAddr) -> Result<(), TransferError>;

    fn listen(&mut self, backlog: i32) -> Result<(), TransferError>;

    /// Local address once bound. Port 0 requests resolve to the real port.
    fn local_endpoint(&self) -> Option<SocketAddr>;

    /// Waits for one inbound connection and becomes that connection.
    /// `None` waits forever. Returns the peer address.
    fn accept(&mut self, timeout: Option<Duration>) -> Result<SocketAddr, TransferError>;

    fn close(&mut self);

    fn state(&self) -> DataSocketState;

    fn is_connected(&self) -> bool {
        self.state() == DataSocketState::Connected
    }
}

enum Inner {
    Unbound,
    Bound(Socket),
    Listening(Socket),
    Connected(TcpStream),
    Closed,
}

/// [`DataSocket`] backed by a real TCP socket.
pub struct TcpDataSocket {
    inner: Inner,
}

impl Default for TcpDataSocket {
    fn default() -> Self {
        Self {
            inner: Inner::Unbound,
        }
    }
}

impl TcpDataSocket {
    pub fn new() -> Self {
        Self::default()
    }

    /// The connected stream, if the server has connected.
    pub fn stream(&self) -> Option<&TcpStream> {
        match &self.inner {
            Inner::Connected(stream) => Some(stream),
            _ => None,
        }
    }

    fn stream_mut(&mut self) -> io::Result<&mut TcpStream> {
        match &mut self.inner {
            Inner::Connected(stream) => Ok(stream),
            _ => Err(io::Error::new(
                ErrorKind::NotConnected,
                "data socket is not connected",
            )),
        }
    }
}

impl DataSocket for TcpDataSocket {
    fn bind(&mut self, addr: SocketAddr) -> Result<(), TransferError> {
        if !matches!(self.inner, Inner::Unbound | Inner::Closed) {
            self.close();
        }

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
            .map_err(|e| TransferError::BindFailed(addr, e))?;
        socket
            .bind(&SockAddr::from(addr))
            .map_err(|e| TransferError::BindFailed(addr, e))?;

        self.inner = Inner::Bound(socket);
        Ok(())
    }

    fn listen(&mut self, backlog: i32) -> Result<(), TransferError> {
        match std::mem::replace(&mut self.inner, Inner::Closed) {
            Inner::Bound(socket) => match socket.listen(backlog) {
                Ok(()) => {
                    self.inner = Inner::Listening(socket);
                    Ok(())
                }
                Err(e) => {
                    self.inner = Inner::Bound(socket);
                    Err(TransferError::ListenerConfigurationFailed(e))
                }
            },
            other => {
                self.inner = other;
                Err(TransferError::NotListening)
            }
        }
    }

    fn local_endpoint(&self) -> Option<SocketAddr> {
        match &self.inner {
            Inner::Bound(socket) | Inner::Listening(socket) => socket.local_addr().ok()?.as_socket(),
            Inner::Connected(stream) => stream.local_addr().ok(),
            Inner::Unbound | Inner::Closed => None,
        }
    }

    fn accept(&mut self, timeout: Option<Duration>) -> Result<SocketAddr, TransferError> {
        let (socket, _) = match &self.inner {
            Inner::Listening(listener) => match timeout {
                None => listener.accept().map_err(TransferError::AcceptFailed)?,
                Some(timeout) => accept_within(listener, timeout)?,
            },
            _ => return Err(TransferError::NotListening),
        };

        let stream: TcpStream = socket.into();
        // Accepted sockets may inherit the listener's non-blocking flag.
        if let Err(e) = stream.set_nonblocking(false) {
            warn!("Failed to set data stream to blocking mode: {}", e);
        }
        let peer = stream.peer_addr().map_err(TransferError::AcceptFailed)?;

        self.inner = Inner::Connected(stream);
        Ok(peer)
    }

    fn close(&mut self) {
        if let Inner::Connected(stream) = std::mem::replace(&mut self.inner, Inner::Closed) {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    fn state(&self) -> DataSocketState {
        match self.inner {
            Inner::Unbound => DataSocketState::Unbound,
            Inner::Bound(_) => DataSocketState::Bound,
            Inner::Listening(_) => DataSocketState::Listening,
            Inner::Connected(_) => DataSocketState::Connected,
            Inner::Closed => DataSocketState::Closed,
        }
    }
}

impl Read for TcpDataSocket {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream_mut()?.read(buf)
    }
}

impl Write for TcpDataSocket {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream_mut()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream_mut()?.flush()
    }
}

/// Polls a non-blocking accept with doubling back-off until `timeout`.
/// A timeout too large to express as an `Instant` waits without a deadline.
fn accept_within(listener: &Socket, timeout: Duration) -> Result<(Socket, SockAddr), TransferError> {
    listener
        .set_nonblocking(true)
        .map_err(TransferError::ListenerConfigurationFailed)?;

    let deadline = Instant::now().checked_add(timeout);
    let mut delay = Duration::from_millis(INITIAL_POLL_MS);
    let mut attempt = 0;

    let result = loop {
        match listener.accept() {
            Ok(accepted) => break Ok(accepted),
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                let mut pause = delay;
                if let Some(deadline) = deadline {
                    let now = Instant::now();
                    if now >= deadline {
                        debug!("Gave up waiting for data connection after {} polls", attempt);
                        break Err(TransferError::AcceptTimeout(timeout));
                    }
                    pause = pause.min(deadline - now);
                }
                thread::sleep(pause);
                delay = (delay * 2).min(Duration::from_millis(MAX_POLL_MS));
                attempt += 1;
            }
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => break Err(TransferError::AcceptFailed(e)),
        }
    };

    let _ = listener.set_nonblocking(false);
    result
}
