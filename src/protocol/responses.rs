//! FTP reply codes
//!
//! Status codes the client checks for explicitly.

pub const SYSTEM_STATUS: u16 = 211;
pub const READY: u16 = 220;
pub const LOGIN_SUCCESS: u16 = 230;
pub const PASSWORD_REQUIRED: u16 = 331;
