//! Room lifecycle orchestration: create, join, delete.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use roomdrop_core::config::rooms::RoomConfig;
use roomdrop_core::error::AppError;
use roomdrop_core::result::AppResult;
use roomdrop_core::traits::storage::StorageProvider;
use roomdrop_entity::room::{CreateRoom, Room};
use roomdrop_storage::layout;

use super::registry::RoomRegistry;
use super::scheduler::ExpiryScheduler;

/// Orchestrates room creation, joining, and deletion.
#[derive(Debug)]
pub struct RoomService {
    /// Durable name → passcode registry.
    registry: Arc<RoomRegistry>,
    /// Per-room expiration tasks.
    scheduler: Arc<ExpiryScheduler>,
    /// Provider owning room storage.
    provider: Arc<dyn StorageProvider>,
    /// Lifecycle configuration.
    config: RoomConfig,
}

impl RoomService {
    /// Creates a new room service.
    pub fn new(
        registry: Arc<RoomRegistry>,
        scheduler: Arc<ExpiryScheduler>,
        provider: Arc<dyn StorageProvider>,
        config: RoomConfig,
    ) -> Self {
        Self {
            registry,
            scheduler,
            provider,
            config,
        }
    }

    /// Create a room: validate and register the name, create its storage
    /// directory, and schedule expiration when the TTL is finite.
    pub async fn create_room(&self, req: CreateRoom) -> AppResult<Room> {
        self.registry.create(&req.name, &req.passcode).await?;
        self.provider
            .create_dir(&layout::room_dir(&req.name))
            .await?;

        let never_expires = req.ttl_seconds >= self.config.never_expire_threshold_seconds;
        if !never_expires {
            self.scheduler
                .schedule(&req.name, Duration::from_secs(req.ttl_seconds));
        }

        info!(
            room = %req.name,
            ttl_seconds = req.ttl_seconds,
            never_expires,
            "Room created"
        );

        Ok(Room {
            name: req.name,
            passcode: req.passcode,
            ttl_seconds: req.ttl_seconds,
            created_at: Utc::now(),
        })
    }

    /// Join a room by name and passcode. An empty stored passcode admits
    /// any supplied passcode; otherwise an exact match is required.
    /// Returns the room name as the caller's room identifier.
    pub async fn join_room(&self, name: &str, passcode: &str) -> AppResult<String> {
        let stored = self
            .registry
            .find(name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No room by the name '{name}'")))?;

        if !stored.is_empty() && stored != passcode {
            return Err(AppError::authentication("Wrong passcode provided"));
        }

        Ok(name.to_string())
    }

    /// Delete a room: cancel its pending expiration, remove its storage
    /// tree, and drop its registry line. Idempotent.
    pub async fn delete_room(&self, name: &str) -> AppResult<()> {
        self.scheduler.cancel(name);
        self.provider.delete_dir(&layout::room_dir(name)).await?;
        self.registry.remove(name).await?;

        info!(room = %name, "Room deleted");
        Ok(())
    }
}
