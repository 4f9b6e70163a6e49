//! Room entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, optionally passcode-protected, optionally time-limited container
/// for messages and files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room name (ASCII word characters only).
    pub name: String,
    /// Shared passcode; empty means the room is public.
    pub passcode: String,
    /// Time-to-live in seconds. Values at or above the configured threshold
    /// mean the room never expires.
    pub ttl_seconds: u64,
    /// When the room was created.
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoom {
    /// Requested room name.
    pub name: String,
    /// Passcode; empty for a public room.
    pub passcode: String,
    /// Time-to-live in seconds.
    pub ttl_seconds: u64,
}
