//! Transfer result types
//!
//! Defines result structures returned by data channel negotiation.

use std::fmt;

use crate::transfer::DataChannelType;

/// Command used to advertise the client's data endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupCommand {
    Eprt,
    Port,
}

impl SetupCommand {
    /// Channel type the command establishes
    pub fn channel_type(self) -> DataChannelType {
        match self {
            SetupCommand::Eprt => DataChannelType::ExtendedActive,
            SetupCommand::Port => DataChannelType::Active,
        }
    }
}

impl fmt::Display for SetupCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupCommand::Eprt => f.write_str("EPRT"),
            SetupCommand::Port => f.write_str("PORT"),
        }
    }
}

/// Result of a successful channel setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSetup {
    /// The requested command was accepted as is.
    Sent(SetupCommand),
    /// EPRT was permanently rejected and the fallback was accepted.
    FellBackTo(SetupCommand),
}

impl ChannelSetup {
    /// The command the server finally accepted
    pub fn command(self) -> SetupCommand {
        match self {
            ChannelSetup::Sent(command) | ChannelSetup::FellBackTo(command) => command,
        }
    }

    /// Channel type in effect for this transfer
    pub fn effective_type(self) -> DataChannelType {
        self.command().channel_type()
    }

    pub fn fell_back(self) -> bool {
        matches!(self, ChannelSetup::FellBackTo(_))
    }
}
