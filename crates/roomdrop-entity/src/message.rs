//! Message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable text message posted into a room.
///
/// The file name is derived from the creation timestamp; the content is
/// never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Storage file name within the room directory.
    pub file_name: String,
    /// When the message was posted.
    pub posted_at: DateTime<Utc>,
}
