//! Module `capabilities`
//!
//! Tracks which optional commands the remote server is believed to support.
//! Filled from the FEAT reply and narrowed when the server rejects an
//! extended command.

use std::collections::HashSet;
use std::fmt;

/// Optional FTP commands a server may advertise in its FEAT reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    EPRT,
    EPSV,
    MLSD,
    SIZE,
    MDTM,
    REST,
    UTF8,
    PRET,
    MFMT,
}

impl Capability {
    /// Maps a FEAT keyword (case-insensitive, arguments ignored) to a capability.
    pub fn from_feat_line(line: &str) -> Option<Self> {
        let keyword = line.split_whitespace().next()?.to_ascii_uppercase();
        match keyword.as_str() {
            "EPRT" => Some(Capability::EPRT),
            "EPSV" => Some(Capability::EPSV),
            "MLSD" | "MLST" => Some(Capability::MLSD),
            "SIZE" => Some(Capability::SIZE),
            "MDTM" => Some(Capability::MDTM),
            "REST" => Some(Capability::REST),
            "UTF8" => Some(Capability::UTF8),
            "PRET" => Some(Capability::PRET),
            "MFMT" => Some(Capability::MFMT),
            _ => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Capability set owned by a control connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    supported: HashSet<Capability>,
}

impl Capabilities {
    /// Builds the set from the body of a 211 FEAT reply.
    ///
    /// The first and last lines ("Features:" / "End") carry no keyword.
    pub fn from_feat_reply(message: &str) -> Self {
        let supported = message
            .lines()
            .filter(|line| line.starts_with(' '))
            .filter_map(Capability::from_feat_line)
            .collect();
        Self { supported }
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.supported.contains(&capability)
    }

    /// Removes a capability. Returns whether it was present.
    pub fn remove(&mut self, capability: Capability) -> bool {
        self.supported.remove(&capability)
    }

    pub fn len(&self) -> usize {
        self.supported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supported.is_empty()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            supported: iter.into_iter().collect(),
        }
    }
}
