//! FTP data channel types
//!
//! Which command advertises the data endpoint, and who connects to whom.

use serde::Deserialize;
use std::fmt;

/// FTP data channel types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataChannelType {
    /// Client listens, advertised with PORT.
    Active,
    /// Client listens, advertised with EPRT.
    ExtendedActive,
    /// Server listens, requested with PASV.
    Passive,
    /// Server listens, requested with EPSV.
    ExtendedPassive,
}

impl DataChannelType {
    /// Whether the client side listens for the data connection.
    pub fn is_active(self) -> bool {
        matches!(self, DataChannelType::Active | DataChannelType::ExtendedActive)
    }
}

impl fmt::Display for DataChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataChannelType::Active => "Active",
            DataChannelType::ExtendedActive => "ExtendedActive",
            DataChannelType::Passive => "Passive",
            DataChannelType::ExtendedPassive => "ExtendedPassive",
        };
        f.write_str(name)
    }
}
