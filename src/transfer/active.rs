//! Module `active`
//!
//! Active mode data streams. The client listens on an ephemeral port,
//! advertises it with EPRT (or PORT), sends the transfer command and then
//! accepts the connection the server opens back.
//!
//! The setup command and the transfer command run under one acquisition of
//! the control lock, so nothing else on the control connection can slip in
//! between them. By default the accept happens under that lock too; see
//! [`ActiveStreamBuilder::accept_outside_lock`].

use log::{debug, info, warn};
use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::control::{Capability, ControlChannel, ControlLockGuard};
use crate::error::{FtpClientError, TransferError};
use crate::protocol::{FtpReply, ReplyClass, format_eprt, format_port};
use crate::transfer::{
    ChannelSetup, DataChannelType, DataSocket, DataSocketState, SetupCommand, TcpDataSocket,
};
use crate::utils::network::listen_address;

/// Builder for [`ActiveStream`].
pub struct ActiveStreamBuilder<C: ControlChannel + ?Sized, S: DataSocket = TcpDataSocket> {
    control: Option<Arc<C>>,
    socket: Option<S>,
    channel_type: DataChannelType,
    accept_timeout: Option<Duration>,
    accept_outside_lock: bool,
    backlog: i32,
}

impl<C: ControlChannel + ?Sized, S: DataSocket + Default> ActiveStreamBuilder<C, S> {
    pub fn new() -> Self {
        Self {
            control: None,
            socket: None,
            channel_type: DataChannelType::ExtendedActive,
            accept_timeout: None,
            accept_outside_lock: false,
            backlog: 1,
        }
    }

    /// Control connection the stream negotiates over. Required.
    pub fn control(mut self, control: Arc<C>) -> Self {
        self.control = Some(control);
        self
    }

    /// Data socket to use instead of a default constructed one.
    pub fn socket(mut self, socket: S) -> Self {
        self.socket = Some(socket);
        self
    }

    /// Defaults to `ExtendedActive`.
    pub fn channel_type(mut self, channel_type: DataChannelType) -> Self {
        self.channel_type = channel_type;
        self
    }

    /// Upper bound on waiting for the server's data connection.
    /// Defaults to waiting forever.
    pub fn accept_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.accept_timeout = timeout;
        self
    }

    /// Release the control lock once the transfer command is answered
    /// instead of after the data connection is accepted.
    ///
    /// Other commands on the control connection then no longer wait for the
    /// server to connect back. Off by default.
    pub fn accept_outside_lock(mut self, outside: bool) -> Self {
        self.accept_outside_lock = outside;
        self
    }

    pub fn backlog(mut self, backlog: i32) -> Self {
        self.backlog = backlog;
        self
    }

    /// Applies the data channel settings of a client configuration.
    pub fn with_config(self, config: &ClientConfig) -> Self {
        self.channel_type(config.channel_type)
            .accept_timeout(config.accept_timeout())
            .accept_outside_lock(config.accept_outside_lock)
            .backlog(config.listen_backlog)
    }

    /// Fails with `InvalidArgument` when no control connection was given.
    /// No socket is created in that case.
    pub fn build(self) -> Result<ActiveStream<C, S>, TransferError> {
        let control = self
            .control
            .ok_or(TransferError::InvalidArgument("control"))?;

        Ok(ActiveStream {
            control,
            socket: self.socket.unwrap_or_default(),
            channel_type: self.channel_type,
            accept_timeout: self.accept_timeout,
            accept_outside_lock: self.accept_outside_lock,
            backlog: self.backlog,
            endpoint: None,
            last_setup: None,
            last_reply: None,
        })
    }
}

impl<C: ControlChannel + ?Sized, S: DataSocket + Default> Default for ActiveStreamBuilder<C, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// An active mode data stream bound to one control connection.
///
/// Owns its data socket exclusively. After a successful [`execute`] the
/// stream is connected and reads/writes go to the server.
///
/// [`execute`]: ActiveStream::execute
pub struct ActiveStream<C: ControlChannel + ?Sized, S: DataSocket = TcpDataSocket> {
    control: Arc<C>,
    socket: S,
    channel_type: DataChannelType,
    accept_timeout: Option<Duration>,
    accept_outside_lock: bool,
    backlog: i32,
    endpoint: Option<SocketAddr>,
    last_setup: Option<ChannelSetup>,
    last_reply: Option<FtpReply>,
}

impl<C: ControlChannel + ?Sized> ActiveStream<C, TcpDataSocket> {
    pub fn builder() -> ActiveStreamBuilder<C, TcpDataSocket> {
        ActiveStreamBuilder::new()
    }
}

impl<C: ControlChannel + ?Sized, S: DataSocket> ActiveStream<C, S> {
    /// Runs a transfer command (LIST, RETR, STOR, ...) over a fresh data
    /// channel and returns the transfer command's reply.
    ///
    /// A rejected setup command is an error. A rejected transfer command is
    /// not: its reply is returned and the stream stays unconnected.
    pub fn execute(&mut self, command: &str) -> Result<FtpReply, FtpClientError> {
        if !self.channel_type.is_active() {
            return Err(TransferError::UnsupportedMode(self.channel_type).into());
        }

        // Never reuse the connection of a previous transfer.
        if self.socket.is_connected() {
            debug!("Closing previous data connection before {}", command);
            self.socket.close();
        }

        let endpoint = self.open()?;

        let control = Arc::clone(&self.control);
        let mut guard = Some(ControlLockGuard::acquire(&*control));

        let setup = negotiate_channel(&*control, self.channel_type, &endpoint)?;
        self.last_setup = Some(setup);

        let reply = control.execute(command)?;
        self.last_reply = Some(reply.clone());

        let accepted = if reply.success() && !self.socket.is_connected() {
            if self.accept_outside_lock {
                drop(guard.take());
            }
            self.accept()
        } else {
            debug!("{} answered {}; not waiting for a data connection", command, reply);
            Ok(())
        };

        // Released here unless already released before the accept.
        drop(guard);
        accepted?;

        Ok(reply)
    }

    /// Binds a new listener on the control connection's interface.
    fn open(&mut self) -> Result<SocketAddr, FtpClientError> {
        // A listener left over from a failed call is replaced, not reused.
        if matches!(
            self.socket.state(),
            DataSocketState::Bound | DataSocketState::Listening
        ) {
            self.socket.close();
        }
        self.endpoint = None;

        let bind_addr = listen_address(self.control.local_endpoint()?);
        self.socket.bind(bind_addr)?;
        self.socket.listen(self.backlog)?;

        let endpoint = self
            .socket
            .local_endpoint()
            .ok_or(TransferError::NotListening)?;
        self.endpoint = Some(endpoint);

        info!("Data socket listening on {}", endpoint);
        Ok(endpoint)
    }

    fn accept(&mut self) -> Result<(), TransferError> {
        let peer = self.socket.accept(self.accept_timeout)?;
        info!("Data connection accepted from {}", peer);
        Ok(())
    }

    /// Closes the data connection or listener.
    pub fn close(&mut self) {
        self.socket.close();
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_connected()
    }

    pub fn state(&self) -> DataSocketState {
        self.socket.state()
    }

    /// Endpoint advertised by the last `execute`.
    pub fn local_endpoint(&self) -> Option<SocketAddr> {
        self.endpoint
    }

    /// How the last channel setup went.
    pub fn last_setup(&self) -> Option<ChannelSetup> {
        self.last_setup
    }

    /// Reply to the last transfer command.
    pub fn last_reply(&self) -> Option<&FtpReply> {
        self.last_reply.as_ref()
    }

    pub fn channel_type(&self) -> DataChannelType {
        self.channel_type
    }

    pub fn control(&self) -> &Arc<C> {
        &self.control
    }

    pub fn socket(&self) -> &S {
        &self.socket
    }
}

impl<C: ControlChannel + ?Sized, S: DataSocket> Read for ActiveStream<C, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.socket.read(buf)
    }
}

impl<C: ControlChannel + ?Sized, S: DataSocket> Write for ActiveStream<C, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.socket.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.socket.flush()
    }
}

impl<C: ControlChannel + ?Sized, S: DataSocket> Drop for ActiveStream<C, S> {
    fn drop(&mut self) {
        self.socket.close();
    }
}

/// Advertises `endpoint` to the server.
///
/// `ExtendedActive` sends EPRT. If the server answers with a permanent
/// negative reply, EPSV and EPRT are dropped from the connection's
/// capabilities and PORT is sent instead. `Active` sends PORT. The caller
/// must hold the control lock.
pub fn negotiate_channel<C: ControlChannel + ?Sized>(
    control: &C,
    channel_type: DataChannelType,
    endpoint: &SocketAddr,
) -> Result<ChannelSetup, FtpClientError> {
    let (setup, reply) = match channel_type {
        DataChannelType::ExtendedActive => {
            let reply = control.execute(&format_eprt(endpoint))?;
            if reply.class() == ReplyClass::PermanentNegative {
                warn!("Server rejected EPRT ({}), falling back to PORT", reply);
                control.remove_capability(Capability::EPSV);
                control.remove_capability(Capability::EPRT);
                let reply = control.execute(&format_port(endpoint)?)?;
                (ChannelSetup::FellBackTo(SetupCommand::Port), reply)
            } else {
                (ChannelSetup::Sent(SetupCommand::Eprt), reply)
            }
        }
        DataChannelType::Active => {
            let reply = control.execute(&format_port(endpoint)?)?;
            (ChannelSetup::Sent(SetupCommand::Port), reply)
        }
        other => return Err(TransferError::UnsupportedMode(other).into()),
    };

    if !reply.success() {
        return Err(FtpClientError::CommandFailed(reply));
    }

    debug!("Data channel set up with {} ({:?})", setup.command(), setup);
    Ok(setup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Capabilities;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Events = Arc<Mutex<Vec<String>>>;

    fn record(events: &Events, event: impl Into<String>) {
        events.lock().unwrap().push(event.into());
    }

    /// Control channel that answers from a script and records everything.
    struct ScriptedControl {
        events: Events,
        replies: Mutex<VecDeque<FtpReply>>,
        capabilities: Mutex<Capabilities>,
        removed: Mutex<Vec<Capability>>,
        locks: AtomicUsize,
        unlocks: AtomicUsize,
    }

    impl ScriptedControl {
        fn new(events: &Events, replies: &[(u16, &str)]) -> Arc<Self> {
            Arc::new(Self {
                events: Arc::clone(events),
                replies: Mutex::new(
                    replies
                        .iter()
                        .map(|(code, msg)| FtpReply::new(*code, *msg))
                        .collect(),
                ),
                capabilities: Mutex::new(
                    [Capability::EPRT, Capability::EPSV, Capability::SIZE]
                        .into_iter()
                        .collect(),
                ),
                removed: Mutex::new(Vec::new()),
                locks: AtomicUsize::new(0),
                unlocks: AtomicUsize::new(0),
            })
        }

        fn sent(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter_map(|e| e.strip_prefix("send ").map(str::to_string))
                .collect()
        }

        fn lock_counts(&self) -> (usize, usize) {
            (
                self.locks.load(Ordering::SeqCst),
                self.unlocks.load(Ordering::SeqCst),
            )
        }
    }

    impl ControlChannel for ScriptedControl {
        fn execute(&self, command: &str) -> Result<FtpReply, FtpClientError> {
            record(&self.events, format!("send {}", command));
            Ok(self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| FtpReply::new(421, "script exhausted")))
        }

        fn lock_control_connection(&self) {
            self.locks.fetch_add(1, Ordering::SeqCst);
            record(&self.events, "lock");
        }

        fn unlock_control_connection(&self) {
            self.unlocks.fetch_add(1, Ordering::SeqCst);
            record(&self.events, "unlock");
        }

        fn remove_capability(&self, capability: Capability) {
            self.removed.lock().unwrap().push(capability);
            self.capabilities.lock().unwrap().remove(capability);
        }

        fn has_capability(&self, capability: Capability) -> bool {
            self.capabilities.lock().unwrap().contains(capability)
        }

        fn local_endpoint(&self) -> Result<SocketAddr, FtpClientError> {
            Ok("127.0.0.1:50021".parse().unwrap())
        }
    }

    /// Data socket that always "binds" to port 4660 and records calls.
    struct FakeSocket {
        events: Events,
        state: DataSocketState,
        bound: Option<SocketAddr>,
        accept_error: bool,
    }

    impl FakeSocket {
        fn new(events: &Events) -> Self {
            Self {
                events: Arc::clone(events),
                state: DataSocketState::Unbound,
                bound: None,
                accept_error: false,
            }
        }
    }

    impl Default for FakeSocket {
        fn default() -> Self {
            Self::new(&Events::default())
        }
    }

    impl DataSocket for FakeSocket {
        fn bind(&mut self, addr: SocketAddr) -> Result<(), TransferError> {
            record(&self.events, format!("bind {}", addr));
            self.bound = Some(SocketAddr::new(addr.ip(), 4660));
            self.state = DataSocketState::Bound;
            Ok(())
        }

        fn listen(&mut self, backlog: i32) -> Result<(), TransferError> {
            record(&self.events, format!("listen {}", backlog));
            self.state = DataSocketState::Listening;
            Ok(())
        }

        fn local_endpoint(&self) -> Option<SocketAddr> {
            self.bound
        }

        fn accept(&mut self, timeout: Option<Duration>) -> Result<SocketAddr, TransferError> {
            record(&self.events, "accept");
            if self.accept_error {
                return Err(TransferError::AcceptTimeout(timeout.unwrap_or_default()));
            }
            self.state = DataSocketState::Connected;
            Ok("127.0.0.1:20".parse().unwrap())
        }

        fn close(&mut self) {
            record(&self.events, "close");
            self.state = DataSocketState::Closed;
            self.bound = None;
        }

        fn state(&self) -> DataSocketState {
            self.state
        }
    }

    impl Read for FakeSocket {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Ok(0)
        }
    }

    impl Write for FakeSocket {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn stream(
        events: &Events,
        control: &Arc<ScriptedControl>,
        channel_type: DataChannelType,
    ) -> ActiveStream<ScriptedControl, FakeSocket> {
        ActiveStreamBuilder::new()
            .control(Arc::clone(control))
            .socket(FakeSocket::new(events))
            .channel_type(channel_type)
            .build()
            .unwrap()
    }

    fn events_of(events: &Events) -> Vec<String> {
        events.lock().unwrap().clone()
    }

    #[test]
    fn test_build_without_control_fails() {
        let events = Events::default();
        let result = ActiveStreamBuilder::<ScriptedControl, FakeSocket>::new()
            .socket(FakeSocket::new(&events))
            .build();

        assert!(matches!(result, Err(TransferError::InvalidArgument("control"))));
        assert!(events_of(&events).is_empty());
    }

    #[test]
    fn test_eprt_accepted() {
        let events = Events::default();
        let control = ScriptedControl::new(
            &events,
            &[(200, "EPRT command successful"), (150, "Opening data connection")],
        );
        let mut stream = stream(&events, &control, DataChannelType::ExtendedActive);

        let reply = stream.execute("LIST").unwrap();

        assert_eq!(reply.code(), 150);
        assert!(stream.is_connected());
        assert_eq!(stream.last_setup(), Some(ChannelSetup::Sent(SetupCommand::Eprt)));
        assert_eq!(
            events_of(&events),
            vec![
                "bind 127.0.0.1:0",
                "listen 1",
                "lock",
                "send EPRT |1|127.0.0.1|4660|",
                "send LIST",
                "accept",
                "unlock",
            ]
        );
        assert!(control.removed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_eprt_rejected_falls_back_to_port() {
        let events = Events::default();
        let control = ScriptedControl::new(
            &events,
            &[
                (500, "EPRT not understood"),
                (200, "PORT command successful"),
                (150, "Opening data connection"),
            ],
        );
        let mut stream = stream(&events, &control, DataChannelType::ExtendedActive);

        let reply = stream.execute("RETR readme.txt").unwrap();

        assert_eq!(reply.code(), 150);
        assert_eq!(
            control.sent(),
            vec![
                "EPRT |1|127.0.0.1|4660|",
                "PORT 127,0,0,1,18,52",
                "RETR readme.txt",
            ]
        );
        assert_eq!(
            *control.removed.lock().unwrap(),
            vec![Capability::EPSV, Capability::EPRT]
        );
        assert!(!control.has_capability(Capability::EPRT));
        assert!(control.has_capability(Capability::SIZE));

        let setup = stream.last_setup().unwrap();
        assert!(setup.fell_back());
        assert_eq!(setup.effective_type(), DataChannelType::Active);
        // The configured type is untouched; the demotion is per call.
        assert_eq!(stream.channel_type(), DataChannelType::ExtendedActive);
    }

    #[test]
    fn test_eprt_transient_failure_does_not_fall_back() {
        let events = Events::default();
        let control = ScriptedControl::new(&events, &[(421, "Service not available")]);
        let mut stream = stream(&events, &control, DataChannelType::ExtendedActive);

        let err = stream.execute("LIST").unwrap_err();

        assert_eq!(err.reply().map(FtpReply::code), Some(421));
        assert_eq!(control.sent(), vec!["EPRT |1|127.0.0.1|4660|"]);
        assert!(control.removed.lock().unwrap().is_empty());
        assert_eq!(control.lock_counts(), (1, 1));
        assert!(!stream.is_connected());
    }

    #[test]
    fn test_port_rejected_after_fallback() {
        let events = Events::default();
        let control = ScriptedControl::new(
            &events,
            &[(502, "EPRT not implemented"), (501, "Illegal PORT command")],
        );
        let mut stream = stream(&events, &control, DataChannelType::ExtendedActive);

        let err = stream.execute("LIST").unwrap_err();

        assert_eq!(err.reply().map(FtpReply::code), Some(501));
        assert_eq!(control.sent().len(), 2);
        assert_eq!(control.lock_counts(), (1, 1));
    }

    #[test]
    fn test_active_sends_port_directly() {
        let events = Events::default();
        let control = ScriptedControl::new(&events, &[(200, "PORT ok"), (150, "Here it comes")]);
        let mut stream = stream(&events, &control, DataChannelType::Active);

        stream.execute("NLST").unwrap();

        assert_eq!(control.sent(), vec!["PORT 127,0,0,1,18,52", "NLST"]);
        assert_eq!(stream.last_setup(), Some(ChannelSetup::Sent(SetupCommand::Port)));
        assert!(control.removed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_passive_type_is_unsupported() {
        let events = Events::default();
        let control = ScriptedControl::new(&events, &[]);
        let mut stream = stream(&events, &control, DataChannelType::ExtendedPassive);

        let err = stream.execute("LIST").unwrap_err();

        assert!(matches!(
            err,
            FtpClientError::Transfer(TransferError::UnsupportedMode(
                DataChannelType::ExtendedPassive
            ))
        ));
        assert!(events_of(&events).is_empty());
        assert_eq!(control.lock_counts(), (0, 0));
    }

    #[test]
    fn test_negotiate_rejects_passive() {
        let events = Events::default();
        let control = ScriptedControl::new(&events, &[]);
        let endpoint: SocketAddr = "127.0.0.1:4660".parse().unwrap();

        let result = negotiate_channel(&*control, DataChannelType::Passive, &endpoint);

        assert!(matches!(
            result,
            Err(FtpClientError::Transfer(TransferError::UnsupportedMode(_)))
        ));
        assert!(control.sent().is_empty());
    }

    #[test]
    fn test_failed_transfer_command_returns_reply_without_accept() {
        let events = Events::default();
        let control = ScriptedControl::new(
            &events,
            &[(200, "EPRT ok"), (550, "No such file")],
        );
        let mut stream = stream(&events, &control, DataChannelType::ExtendedActive);

        let reply = stream.execute("RETR missing.bin").unwrap();

        assert_eq!(reply.code(), 550);
        assert!(!reply.success());
        assert!(!stream.is_connected());
        assert!(!events_of(&events).contains(&"accept".to_string()));
        assert_eq!(control.lock_counts(), (1, 1));
    }

    #[test]
    fn test_lock_balanced_across_outcomes() {
        let events = Events::default();
        let control = ScriptedControl::new(
            &events,
            &[
                (200, "EPRT ok"),
                (150, "ok"),
                (421, "busy"),
                (500, "no EPRT"),
                (200, "PORT ok"),
                (550, "missing"),
                (200, "EPRT ok"),
                (150, "ok"),
            ],
        );
        let mut stream = stream(&events, &control, DataChannelType::ExtendedActive);

        assert!(stream.execute("LIST").is_ok());
        assert!(stream.execute("LIST").is_err());
        assert!(stream.execute("RETR missing").is_ok());
        assert!(stream.execute("LIST").is_ok());

        assert_eq!(control.lock_counts(), (4, 4));
    }

    #[test]
    fn test_accept_failure_releases_lock() {
        let events = Events::default();
        let control = ScriptedControl::new(&events, &[(200, "EPRT ok"), (150, "ok")]);
        let mut socket = FakeSocket::new(&events);
        socket.accept_error = true;
        let mut stream = ActiveStreamBuilder::new()
            .control(Arc::clone(&control))
            .socket(socket)
            .accept_timeout(Some(Duration::from_millis(10)))
            .build()
            .unwrap();

        let err = stream.execute("LIST").unwrap_err();

        assert!(matches!(
            err,
            FtpClientError::Transfer(TransferError::AcceptTimeout(_))
        ));
        assert_eq!(control.lock_counts(), (1, 1));
        // The transfer reply is still recorded for diagnostics.
        assert_eq!(stream.last_reply().map(FtpReply::code), Some(150));
    }

    #[test]
    fn test_repeated_execute_closes_previous_connection() {
        let events = Events::default();
        let control = ScriptedControl::new(
            &events,
            &[(200, "ok"), (150, "ok"), (200, "ok"), (150, "ok")],
        );
        let mut stream = stream(&events, &control, DataChannelType::ExtendedActive);

        stream.execute("LIST").unwrap();
        events.lock().unwrap().clear();
        stream.execute("LIST").unwrap();

        let log = events_of(&events);
        assert_eq!(log[0], "close");
        assert_eq!(log[1], "bind 127.0.0.1:0");
        assert_eq!(log.iter().filter(|e| *e == "close").count(), 1);
        assert!(stream.is_connected());
    }

    #[test]
    fn test_accept_outside_lock_releases_first() {
        let events = Events::default();
        let control = ScriptedControl::new(&events, &[(200, "ok"), (150, "ok")]);
        let mut stream = ActiveStreamBuilder::new()
            .control(Arc::clone(&control))
            .socket(FakeSocket::new(&events))
            .accept_outside_lock(true)
            .build()
            .unwrap();

        stream.execute("LIST").unwrap();

        let log = events_of(&events);
        let unlock = log.iter().position(|e| e == "unlock").unwrap();
        let accept = log.iter().position(|e| e == "accept").unwrap();
        assert!(unlock < accept);
        assert_eq!(control.lock_counts(), (1, 1));
    }

    #[test]
    fn test_accept_failure_outside_lock_releases_once() {
        let events = Events::default();
        let control = ScriptedControl::new(&events, &[(200, "EPRT ok"), (150, "ok")]);
        let mut socket = FakeSocket::new(&events);
        socket.accept_error = true;
        let mut stream = ActiveStreamBuilder::new()
            .control(Arc::clone(&control))
            .socket(socket)
            .accept_outside_lock(true)
            .accept_timeout(Some(Duration::from_millis(10)))
            .build()
            .unwrap();

        assert!(stream.execute("LIST").is_err());

        let log = events_of(&events);
        let unlock = log.iter().position(|e| e == "unlock").unwrap();
        let accept = log.iter().position(|e| e == "accept").unwrap();
        assert!(unlock < accept);
        assert_eq!(control.lock_counts(), (1, 1));
    }

    #[test]
    fn test_with_config() {
        let events = Events::default();
        let control = ScriptedControl::new(&events, &[]);
        let config = ClientConfig {
            channel_type: DataChannelType::Active,
            accept_timeout_secs: 5,
            ..ClientConfig::default()
        };

        let stream = ActiveStreamBuilder::<_, FakeSocket>::new()
            .control(control)
            .with_config(&config)
            .build()
            .unwrap();

        assert_eq!(stream.channel_type(), DataChannelType::Active);
        assert_eq!(stream.accept_timeout, Some(Duration::from_secs(5)));
    }
}
