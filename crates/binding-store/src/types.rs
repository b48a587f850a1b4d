//! Stored entity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A persisted link between a chain address and a Discord user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AddressBinding {
    /// Checksummed 0x address. Primary key.
    pub address: String,
    /// Discord user id (snowflake rendered as a string).
    pub discord_id: String,
}

/// Per-channel announcement flags, one row per channel.
///
/// A channel without a row reads as all flags off; that default is
/// synthesized on read and never written back implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChannelEvents {
    /// Discord channel id.
    pub channel: String,
    pub transfer: bool,
    pub asteroid_scanned: bool,
}

impl ChannelEvents {
    /// The synthesized default for a channel with no stored row.
    pub fn unset(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            transfer: false,
            asteroid_scanned: false,
        }
    }

    pub fn get(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Transfer => self.transfer,
            EventKind::AsteroidScanned => self.asteroid_scanned,
        }
    }

    pub fn set(&mut self, kind: EventKind, enabled: bool) {
        match kind {
            EventKind::Transfer => self.transfer = enabled,
            EventKind::AsteroidScanned => self.asteroid_scanned = enabled,
        }
    }
}

/// Announceable on-chain event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Transfer,
    AsteroidScanned,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::Transfer, EventKind::AsteroidScanned];

    /// Column name backing this flag in `channel_events`.
    pub(crate) fn column(&self) -> &'static str {
        match self {
            EventKind::Transfer => "transfer",
            EventKind::AsteroidScanned => "asteroid_scanned",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Transfer => "Transfer",
            EventKind::AsteroidScanned => "AsteroidScanned",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transfer" => Ok(EventKind::Transfer),
            "asteroidscanned" | "scanned" => Ok(EventKind::AsteroidScanned),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

/// Parse error for [`EventKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind(pub String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}
