//! Input validation utilities
//!
//! Checks commands before they are written to the control connection.

/// Longest command line accepted, excluding the CRLF terminator.
pub const MAX_COMMAND_LENGTH: usize = 510;

/// A command must be non-empty, fit on one line and contain no NUL.
pub fn is_valid_command(input: &str) -> bool {
    !input.trim().is_empty()
        && input.len() <= MAX_COMMAND_LENGTH
        && !input.contains('\0')
        && !input.contains('\r')
        && !input.contains('\n')
}
