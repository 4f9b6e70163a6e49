//! File version entity.

use serde::{Deserialize, Serialize};

/// One immutable numbered revision of a versioned file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Sequential version number, contiguous from 1.
    pub number: u64,
    /// Blob file name within the version folder (`"3.pdf"`, `"3"`).
    pub file_name: String,
    /// Change note recorded when the version completed, if any.
    pub note: Option<String>,
}
