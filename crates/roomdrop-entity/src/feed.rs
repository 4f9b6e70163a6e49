//! Content feed snapshot types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Label reported in a snapshot when the room's directory no longer exists.
pub const DELETED_LABEL: &str = "DELETED";

/// One classified entry in a room's content feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedEntry {
    /// Inline text content (messages, the deleted-room notice).
    Text(String),
    /// Path to a downloadable artifact (version folder, standalone file,
    /// archive).
    Path(String),
}

/// A point-in-time listing of a room's content, keyed by display label.
///
/// Suitable both for a full page render and for the lightweight poll; the
/// label order carries no meaning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedSnapshot {
    /// Label → content-or-path mapping.
    pub entries: BTreeMap<String, FeedEntry>,
}

impl FeedSnapshot {
    /// Whether this snapshot reports the room as deleted.
    pub fn room_deleted(&self) -> bool {
        self.entries.contains_key(DELETED_LABEL)
    }
}
