//! Point-in-time room content listing.
//!
//! Read-only and stateless over room storage: a snapshot classifies every
//! top-level entry of the room directory. A reader may race an in-flight
//! upload; entries that do not parse yet are skipped, never an error.

use std::sync::Arc;

use tracing::{debug, warn};

use roomdrop_core::result::AppResult;
use roomdrop_core::traits::storage::StorageProvider;
use roomdrop_core::types::{decode_folder_name, version_stem};
use roomdrop_entity::feed::{FeedEntry, FeedSnapshot, DELETED_LABEL};
use roomdrop_storage::layout;

/// Assembles room content snapshots for rendering and polling.
#[derive(Debug)]
pub struct FeedService {
    /// Provider owning room storage.
    provider: Arc<dyn StorageProvider>,
}

impl FeedService {
    /// Creates a new feed service.
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Produce a snapshot of a room's content.
    ///
    /// Messages are keyed `msg<i>` by ordinal index with their text inlined
    /// (newlines flattened to spaces); version folders are keyed
    /// `"<display name>: Version <n>"` with the folder path as value;
    /// everything else maps its file name to its path. When the room's
    /// directory no longer exists the snapshot carries the single
    /// [`DELETED_LABEL`] entry.
    pub async fn snapshot(&self, room: &str) -> AppResult<FeedSnapshot> {
        let dir = layout::room_dir(room);
        if !self.provider.exists(&dir).await? {
            let mut snapshot = FeedSnapshot::default();
            snapshot.entries.insert(
                DELETED_LABEL.to_string(),
                FeedEntry::Text(format!("Room '{room}' no longer exists")),
            );
            return Ok(snapshot);
        }

        let mut snapshot = FeedSnapshot::default();
        let mut message_index = 0usize;

        for meta in self.provider.list(&dir).await? {
            if meta.is_directory {
                match self.latest_version_in(&meta.path).await? {
                    Some(version) => {
                        let display = decode_folder_name(&meta.name);
                        snapshot.entries.insert(
                            format!("{display}: Version {version}"),
                            FeedEntry::Path(meta.path),
                        );
                    }
                    // Mid-upload folder with nothing parsable yet.
                    None => debug!(room, folder = %meta.name, "Skipping empty version folder"),
                }
            } else if is_message_file(&meta.name) {
                match self.provider.read_bytes(&meta.path).await {
                    Ok(raw) => {
                        let text = String::from_utf8_lossy(&raw).replace(['\n', '\r'], " ");
                        snapshot
                            .entries
                            .insert(format!("msg{message_index}"), FeedEntry::Text(text));
                        message_index += 1;
                    }
                    Err(e) => {
                        warn!(room, file = %meta.name, error = %e, "Skipping unreadable message")
                    }
                }
            } else {
                snapshot
                    .entries
                    .insert(meta.name, FeedEntry::Path(meta.path));
            }
        }

        Ok(snapshot)
    }

    /// Highest parsable version number inside a version folder.
    async fn latest_version_in(&self, folder_path: &str) -> AppResult<Option<u64>> {
        let mut max = None;
        for meta in self.provider.list(folder_path).await? {
            if meta.is_directory {
                continue;
            }
            if let Some(number) = version_stem(&meta.name) {
                max = Some(max.map_or(number, |m: u64| m.max(number)));
            }
        }
        Ok(max)
    }
}

/// Whether a room entry is a message file.
fn is_message_file(name: &str) -> bool {
    name.starts_with(layout::MESSAGE_PREFIX) && name.ends_with(".txt")
}
