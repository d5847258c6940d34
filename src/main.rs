//! RAX FTP Client - Entry Point
//!
//! Runs one transfer command over an active mode data channel and prints
//! what the server sends back.
//!
//! Usage: `rax-ftp-client [COMMAND]` (default `LIST`)

use log::{error, info};
use std::io;

use rax_ftp_client::config::ClientConfig;
use rax_ftp_client::error::handlers::{error_to_exit_code, handle_error};
use rax_ftp_client::session::run_transfer;
use rax_ftp_client::utils::logging::setup_logging;

#[tokio::main]
async fn main() {
    setup_logging();

    let command = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let command = if command.is_empty() {
        "LIST".to_string()
    } else {
        command
    };

    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(78);
        }
    };

    info!(
        "Running {} against {} ({} mode)",
        command,
        config.control_socket(),
        config.channel_type
    );

    // The handshake is blocking socket I/O.
    let result = tokio::task::spawn_blocking(move || {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        run_transfer(&config, &command, &mut out)
    })
    .await;

    match result {
        Ok(Ok(reply)) => info!("Transfer finished: {}", reply),
        Ok(Err(e)) => {
            handle_error(&e);
            std::process::exit(error_to_exit_code(&e));
        }
        Err(e) => {
            error!("Transfer task failed: {}", e);
            std::process::exit(1);
        }
    }
}
