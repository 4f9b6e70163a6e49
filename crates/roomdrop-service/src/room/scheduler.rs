//! Room expiry scheduling.
//!
//! One cancellable one-shot task per room with a finite TTL. Tasks are
//! keyed by room name so explicit deletion cancels the pending timer and a
//! recreated room always gets a fresh, independent one.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use roomdrop_core::traits::storage::StorageProvider;
use roomdrop_storage::layout;

use super::registry::RoomRegistry;

/// Schedules and cancels per-room expiration tasks.
#[derive(Debug)]
pub struct ExpiryScheduler {
    /// Registry to unregister expired rooms from.
    registry: Arc<RoomRegistry>,
    /// Provider owning the room storage trees.
    provider: Arc<dyn StorageProvider>,
    /// Room name → pending expiration task.
    tasks: Arc<DashMap<String, JoinHandle<()>>>,
}

impl ExpiryScheduler {
    /// Creates a new expiry scheduler.
    pub fn new(registry: Arc<RoomRegistry>, provider: Arc<dyn StorageProvider>) -> Self {
        Self {
            registry,
            provider,
            tasks: Arc::new(DashMap::new()),
        }
    }

    /// Schedule expiration of a room after `ttl`. Any pending task for the
    /// same name is cancelled first, so rescheduling always restarts the
    /// clock.
    pub fn schedule(&self, room: &str, ttl: Duration) {
        if let Some((_, stale)) = self.tasks.remove(room) {
            stale.abort();
        }

        let name = room.to_string();
        let registry = Arc::clone(&self.registry);
        let provider = Arc::clone(&self.provider);
        let tasks = Arc::clone(&self.tasks);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;

            info!(room = %name, "Room TTL elapsed, expiring");
            // delete_dir is a no-op on an already-absent tree.
            if let Err(e) = provider.delete_dir(&layout::room_dir(&name)).await {
                warn!(room = %name, error = %e, "Failed to delete expired room storage");
            }
            if let Err(e) = registry.remove(&name).await {
                warn!(room = %name, error = %e, "Failed to unregister expired room");
            }
            tasks.remove(&name);
        });

        self.tasks.insert(room.to_string(), handle);
        info!(room, ttl_seconds = ttl.as_secs(), "Expiration scheduled");
    }

    /// Cancel a room's pending expiration, if any. Returns whether a task
    /// was actually cancelled.
    pub fn cancel(&self, room: &str) -> bool {
        match self.tasks.remove(room) {
            Some((_, handle)) => {
                handle.abort();
                info!(room, "Expiration cancelled");
                true
            }
            None => false,
        }
    }

    /// Whether a room currently has a pending expiration task.
    pub fn is_scheduled(&self, room: &str) -> bool {
        self.tasks.contains_key(room)
    }
}
