//! Version control store.
//!
//! Each versioned file owns a folder containing immutable numbered blobs
//! and an append-only `VersionInfo` change-note log. While a multi-chunk
//! upload is in flight, the version number is pinned in a session table
//! keyed by `(room, folder)` — concurrent uploads to different targets
//! never share state.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use tracing::{info, warn};

use roomdrop_core::error::{AppError, ErrorKind};
use roomdrop_core::result::AppResult;
use roomdrop_core::traits::storage::StorageProvider;
use roomdrop_core::types::{
    decode_folder_name, display_extension, encode_display_name, version_stem,
};
use roomdrop_entity::file::VersionEntry;
use roomdrop_storage::layout;

/// A version number pinned for an in-flight upload, plus the blob path its
/// chunks write into.
#[derive(Debug, Clone)]
pub struct PinnedVersion {
    /// The version number all chunks of this upload land in.
    pub version: u64,
    /// Provider path of the version blob.
    pub blob_path: String,
}

/// Manages version folders, numbering, and the change-note log.
#[derive(Debug)]
pub struct VersionStore {
    /// Provider owning room storage.
    provider: Arc<dyn StorageProvider>,
    /// In-flight upload sessions: `(room, folder)` → pinned version.
    active: DashMap<(String, String), u64>,
}

impl VersionStore {
    /// Creates a new version store.
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self {
            provider,
            active: DashMap::new(),
        }
    }

    /// Resolve the version number an arriving chunk belongs to.
    ///
    /// A continuation (session already active for this target) reuses the
    /// pinned number. Otherwise this starts a new session: version 1 for a
    /// fresh target (creating its folder and log), or `max + 1` for an
    /// existing one. The number stays pinned until [`complete`] or
    /// [`abort`](Self::abort).
    ///
    /// [`complete`]: Self::complete
    pub async fn begin_or_continue(&self, room: &str, display: &str) -> AppResult<PinnedVersion> {
        let folder = encode_display_name(display)?;
        let key = (room.to_string(), folder.clone());

        let version = match self.active.get(&key).map(|v| *v) {
            Some(pinned) => pinned,
            None => {
                let dir = layout::version_dir(room, &folder);
                let version = if self.provider.exists(&dir).await? {
                    self.max_version(room, &folder).await?.unwrap_or(0) + 1
                } else {
                    self.provider.create_dir(&dir).await?;
                    self.provider
                        .write(&layout::version_log(room, &folder), Bytes::new())
                        .await?;
                    1
                };
                // If another chunk of the same upload raced us here, keep
                // whichever number landed first.
                *self.active.entry(key).or_insert(version)
            }
        };

        let blob = layout::version_blob_name(version, display_extension(display));
        Ok(PinnedVersion {
            version,
            blob_path: layout::version_blob(room, &folder, &blob),
        })
    }

    /// Record a completed version: append its change note to the log, then
    /// release the session so the next upload starts a new version.
    ///
    /// Must only be called after the final chunk's blob write succeeded —
    /// the log is the source of truth for which versions exist.
    pub async fn complete(
        &self,
        room: &str,
        display: &str,
        version: u64,
        note: &str,
    ) -> AppResult<()> {
        let folder = encode_display_name(display)?;

        let flattened = flatten_note(note);
        let line = format!("Version {version}: {flattened}\n");
        self.provider
            .append(&layout::version_log(room, &folder), Bytes::from(line))
            .await?;

        self.active.remove(&(room.to_string(), folder));

        let file = display;
        info!(room, file = %file, version, "Version completed");
        Ok(())
    }

    /// Abort an in-flight upload after a failed chunk write: release the
    /// session and delete the partial blob so the number can be reused.
    pub async fn abort(&self, room: &str, display: &str, pinned: &PinnedVersion) {
        if let Ok(folder) = encode_display_name(display) {
            self.active.remove(&(room.to_string(), folder));
        }
        if let Err(e) = self.provider.delete(&pinned.blob_path).await {
            let file = display;
            warn!(
                room,
                file = %file,
                version = pinned.version,
                error = %e,
                "Failed to remove partial version blob"
            );
        }
    }

    /// List a target's versions in ascending order, with each entry's note
    /// resolved from the log (the last matching line wins).
    pub async fn list_versions(&self, room: &str, display: &str) -> AppResult<Vec<VersionEntry>> {
        let folder = encode_display_name(display)?;
        let dir = layout::version_dir(room, &folder);
        if !self.provider.exists(&dir).await? {
            return Err(AppError::not_found(format!(
                "No versioned file '{display}' in room '{room}'"
            )));
        }

        let notes = self.load_notes(room, &folder).await?;

        let mut entries = Vec::new();
        for meta in self.provider.list(&dir).await? {
            if meta.is_directory {
                continue;
            }
            match version_stem(&meta.name) {
                Some(number) => entries.push(VersionEntry {
                    number,
                    file_name: meta.name,
                    note: notes.get(&number).cloned(),
                }),
                None => {
                    if meta.name != layout::VERSION_LOG_FILE {
                        warn!(room, entry = %meta.name, "Skipping unparsable version entry");
                    }
                }
            }
        }
        entries.sort_by_key(|e| e.number);
        Ok(entries)
    }

    /// The latest version entry for a target, or `None` when no parsable
    /// version blob exists yet.
    pub async fn latest_version(
        &self,
        room: &str,
        display: &str,
    ) -> AppResult<Option<VersionEntry>> {
        Ok(self.list_versions(room, display).await?.into_iter().last())
    }

    /// Restore a target's display name from its folder name.
    pub fn display_name(folder: &str) -> String {
        decode_folder_name(folder)
    }

    /// Display names of all version-tracked files in a room, so clients can
    /// follow their status without re-deriving folder names.
    pub async fn tracked_files(&self, room: &str) -> AppResult<Vec<String>> {
        let mut names = Vec::new();
        for meta in self.provider.list(&layout::room_dir(room)).await? {
            if meta.is_directory {
                names.push(decode_folder_name(&meta.name));
            }
        }
        Ok(names)
    }

    /// Highest numeric version identifier present in a folder, skipping
    /// entries whose names do not parse (logged, never fatal).
    async fn max_version(&self, room: &str, folder: &str) -> AppResult<Option<u64>> {
        let mut max = None;
        for meta in self
            .provider
            .list(&layout::version_dir(room, folder))
            .await?
        {
            match version_stem(&meta.name) {
                Some(number) => max = Some(max.map_or(number, |m: u64| m.max(number))),
                None => {
                    if meta.name != layout::VERSION_LOG_FILE {
                        warn!(room, entry = %meta.name, "Skipping unparsable version entry");
                    }
                }
            }
        }
        Ok(max)
    }

    /// Parse the change-note log into version → note. Later lines win on
    /// duplicate version numbers (append-only log with possible re-entries).
    async fn load_notes(&self, room: &str, folder: &str) -> AppResult<HashMap<u64, String>> {
        let raw = match self
            .provider
            .read_bytes(&layout::version_log(room, folder))
            .await
        {
            Ok(bytes) => bytes,
            Err(e) if e.kind == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e),
        };
        let text = String::from_utf8_lossy(&raw);

        let mut notes = HashMap::new();
        for line in text.lines() {
            let Some(rest) = line.strip_prefix("Version ") else {
                continue;
            };
            let Some((number, note)) = rest.split_once(": ") else {
                continue;
            };
            if let Ok(number) = number.parse::<u64>() {
                notes.insert(number, note.to_string());
            }
        }
        Ok(notes)
    }
}

/// Collapse newlines so a note occupies exactly one log line.
fn flatten_note(note: &str) -> String {
    note.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
