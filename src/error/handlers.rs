//! Error handlers
//!
//! Provides error reporting helpers.

use crate::error::types::FtpClientError;
use log::error;

/// Log an FTP client error
pub fn handle_error(err: &FtpClientError) {
    error!("FTP Client Error: {}", err);
}

/// Process exit code for an error surfaced by the binary
pub fn error_to_exit_code(err: &FtpClientError) -> i32 {
    match err {
        FtpClientError::ConfigError(_) => 78,
        FtpClientError::CommandFailed(_) => 2,
        FtpClientError::Protocol(_) => 3,
        FtpClientError::Transfer(_) => 4,
        FtpClientError::IoError(_) => 5,
    }
}
