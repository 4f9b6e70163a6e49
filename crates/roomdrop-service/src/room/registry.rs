//! Durable room registry.
//!
//! One UTF-8 line per room, `"<name> : <passcode>"`; the passcode may be
//! empty after the separator. Deletion rewrites the whole file (read all,
//! filter, write all), so every mutation runs under a single-writer lock.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::{info, warn};

use roomdrop_core::error::{AppError, ErrorKind};
use roomdrop_core::result::AppResult;
use roomdrop_core::traits::storage::StorageProvider;
use roomdrop_core::types::is_valid_room_name;
use roomdrop_storage::layout;

/// Separator between the room name and the passcode on a registry line.
const LINE_SEPARATOR: &str = " : ";

/// File-backed registry mapping room name → passcode.
#[derive(Debug)]
pub struct RoomRegistry {
    /// Storage provider holding the registry file.
    provider: Arc<dyn StorageProvider>,
    /// Single-writer lock serializing registry mutation.
    write_lock: Mutex<()>,
}

impl RoomRegistry {
    /// Creates a new registry over the given provider.
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self {
            provider,
            write_lock: Mutex::new(()),
        }
    }

    /// Register a room. Fails with a validation error for a malformed name
    /// and a conflict error when the name is already taken.
    ///
    /// Duplicate detection is an exact membership test against the parsed
    /// names, never a pattern match over the raw file, so a name that is a
    /// substring of an existing room (`team` vs `teamalpha`) registers fine.
    pub async fn create(&self, name: &str, passcode: &str) -> AppResult<()> {
        if !is_valid_room_name(name) {
            return Err(AppError::validation(format!(
                "Room names are a single word (letters, digits, underscore): '{name}'"
            )));
        }

        let _guard = self.write_lock.lock().await;

        let rooms = self.load().await?;
        if rooms.iter().any(|(existing, _)| existing == name) {
            return Err(AppError::conflict(format!(
                "Room '{name}' already exists"
            )));
        }

        let line = format!("{name}{LINE_SEPARATOR}{passcode}\n");
        self.provider
            .append(layout::REGISTRY_FILE, Bytes::from(line))
            .await?;

        info!(room = %name, "Room registered");
        Ok(())
    }

    /// Look up a room's stored passcode. `None` when the room is unknown.
    pub async fn find(&self, name: &str) -> AppResult<Option<String>> {
        let rooms = self.load().await?;
        Ok(rooms
            .into_iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, passcode)| passcode))
    }

    /// All registered room names.
    pub async fn names(&self) -> AppResult<Vec<String>> {
        Ok(self.load().await?.into_iter().map(|(n, _)| n).collect())
    }

    /// Remove a room's registry line. Idempotent: a no-op when the room is
    /// already absent.
    pub async fn remove(&self, name: &str) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;

        let rooms = self.load().await?;
        let remaining: Vec<_> = rooms
            .iter()
            .filter(|(existing, _)| existing != name)
            .collect();
        if remaining.len() == rooms.len() {
            return Ok(());
        }

        let mut contents = String::new();
        for (room, passcode) in &remaining {
            contents.push_str(room);
            contents.push_str(LINE_SEPARATOR);
            contents.push_str(passcode);
            contents.push('\n');
        }
        self.provider
            .write(layout::REGISTRY_FILE, Bytes::from(contents))
            .await?;

        info!(room = %name, "Room unregistered");
        Ok(())
    }

    /// Parse the registry file into `(name, passcode)` pairs. A missing
    /// file is an empty registry; malformed lines are skipped.
    async fn load(&self) -> AppResult<Vec<(String, String)>> {
        let raw = match self.provider.read_bytes(layout::REGISTRY_FILE).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let text = String::from_utf8_lossy(&raw);
        let mut rooms = Vec::new();
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            match line.split_once(LINE_SEPARATOR) {
                Some((name, passcode)) => rooms.push((name.to_string(), passcode.to_string())),
                None => warn!(line, "Skipping malformed registry line"),
            }
        }
        Ok(rooms)
    }
}
