//! Module `session`
//!
//! One complete active mode transfer: connect, log in, run a transfer
//! command over an [`ActiveStream`], copy the data out and collect the
//! completion reply.

use log::{info, warn};
use std::io::{self, Write};
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::control::FtpControlConnection;
use crate::error::FtpClientError;
use crate::protocol::FtpReply;
use crate::transfer::ActiveStream;

/// Runs `command` (LIST, NLST, RETR <file>) and writes the received data
/// to `out`. Returns the server's final transfer reply.
///
/// Once connected, QUIT is sent whether or not the transfer succeeded.
pub fn run_transfer<W: Write>(
    config: &ClientConfig,
    command: &str,
    out: &mut W,
) -> Result<FtpReply, FtpClientError> {
    let connection = Arc::new(FtpControlConnection::connect(config)?);
    let result = transfer(&connection, config, command, out);

    if let Err(e) = connection.quit() {
        warn!("QUIT failed: {}", e);
    }
    result
}

fn transfer<W: Write>(
    connection: &Arc<FtpControlConnection>,
    config: &ClientConfig,
    command: &str,
    out: &mut W,
) -> Result<FtpReply, FtpClientError> {
    connection.login(&config.username, &config.password)?;
    connection.load_capabilities()?;

    let mut stream = ActiveStream::builder()
        .control(Arc::clone(connection))
        .with_config(config)
        .build()?;

    let reply = stream.execute(command)?;
    if !reply.success() {
        return Err(FtpClientError::CommandFailed(reply));
    }

    let copied = io::copy(&mut stream, out)?;
    stream.close();
    info!("Received {} bytes for {}", copied, command);

    // 1xx means the server still owes a completion reply.
    let reply = if reply.code() < 200 {
        connection.read_reply()?
    } else {
        reply
    };
    if !reply.success() {
        return Err(FtpClientError::CommandFailed(reply));
    }
    Ok(reply)
}
