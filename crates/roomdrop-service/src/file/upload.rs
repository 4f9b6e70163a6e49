//! Chunked upload ingestion.
//!
//! Entry point for every inbound chunk. Chunks carry their own byte offset,
//! so retries and out-of-order arrival are idempotent by construction; the
//! tracker decides where the bytes land (version blob or archive staging),
//! records which chunk indices have been satisfied, and recognizes
//! completion once all declared chunks of a file have arrived.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{error, info};

use roomdrop_core::config::storage::StorageConfig;
use roomdrop_core::error::AppError;
use roomdrop_core::result::AppResult;
use roomdrop_core::traits::storage::StorageProvider;
use roomdrop_entity::file::{ChunkPut, UploadMode, UploadOutcome};
use roomdrop_storage::layout;
use roomdrop_storage::ArchiveBuilder;

use super::version::VersionStore;

/// Session key: room, scope (empty for version mode, batch name for archive
/// mode), and the file's display name.
type SessionKey = (String, String, String);

/// Routes inbound chunks and tracks per-target upload sessions.
#[derive(Debug)]
pub struct UploadService {
    /// Provider owning room storage.
    provider: Arc<dyn StorageProvider>,
    /// Version control store for version-mode uploads.
    versions: Arc<VersionStore>,
    /// Builder materializing completed archive batches.
    archives: ArchiveBuilder,
    /// Chunk indices satisfied so far, per in-flight file.
    progress: DashMap<SessionKey, HashSet<u32>>,
    /// Completed files per `(room, batch)` staging area.
    staged: DashMap<(String, String), HashSet<String>>,
    /// Storage limits.
    config: StorageConfig,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        provider: Arc<dyn StorageProvider>,
        versions: Arc<VersionStore>,
        archives: ArchiveBuilder,
        config: StorageConfig,
    ) -> Self {
        Self {
            provider,
            versions,
            archives,
            progress: DashMap::new(),
            staged: DashMap::new(),
            config,
        }
    }

    /// Ingest one chunk for a room.
    ///
    /// Any write error aborts the affected session and surfaces to the
    /// caller — it is never absorbed.
    pub async fn put_chunk(&self, room: &str, chunk: ChunkPut) -> AppResult<UploadOutcome> {
        if !self.provider.exists(&layout::room_dir(room)).await? {
            return Err(AppError::not_found(format!("No room by the name '{room}'")));
        }

        if chunk.total_chunks == 0 || chunk.chunk_index >= chunk.total_chunks {
            return Err(AppError::validation(format!(
                "Invalid chunk index {} of {}",
                chunk.chunk_index, chunk.total_chunks
            )));
        }

        let end = chunk.byte_offset + chunk.data.len() as u64;
        if end > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "Upload exceeds maximum size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        match chunk.mode.clone() {
            UploadMode::Archive {
                batch,
                declared_files,
            } => {
                self.put_archive_chunk(room, &batch, declared_files, chunk)
                    .await
            }
            UploadMode::Version => self.put_version_chunk(room, chunk).await,
        }
    }

    /// Record a satisfied chunk index. Returns `true` when every declared
    /// index of the file has now arrived (retries do not double-count).
    fn record_chunk(&self, key: &SessionKey, index: u32, total: u32) -> bool {
        let mut received = self.progress.entry(key.clone()).or_default();
        received.insert(index);
        received.len() as u32 >= total
    }

    /// Archive mode: stage the chunk; bundle once the batch is complete.
    async fn put_archive_chunk(
        &self,
        room: &str,
        batch: &str,
        declared_files: u32,
        chunk: ChunkPut,
    ) -> AppResult<UploadOutcome> {
        let path = layout::staging_file(room, batch, &chunk.file_name);
        self.provider
            .write_at(&path, chunk.byte_offset, chunk.data.clone())
            .await
            .inspect_err(|e| {
                error!(room, batch, file = %chunk.file_name, error = %e, "Chunk write failed");
            })?;

        let key = (
            room.to_string(),
            batch.to_string(),
            chunk.file_name.clone(),
        );
        if !self.record_chunk(&key, chunk.chunk_index, chunk.total_chunks) {
            return Ok(UploadOutcome::InProgress);
        }
        self.progress.remove(&key);

        let batch_key = (room.to_string(), batch.to_string());
        let staged = {
            let mut done = self.staged.entry(batch_key.clone()).or_default();
            done.insert(chunk.file_name.clone());
            done.len() as u32
        };

        info!(
            room,
            batch,
            file = %chunk.file_name,
            staged,
            declared = declared_files,
            "Staged file completed"
        );

        if staged < declared_files {
            return Ok(UploadOutcome::ArchiveStaged {
                staged,
                declared: declared_files,
            });
        }

        let archive_name = self.archives.bundle(room, batch).await?;
        self.staged.remove(&batch_key);
        Ok(UploadOutcome::ArchiveCompleted { archive_name })
    }

    /// Version mode: write into the session's pinned version; log the
    /// change note once all chunks have landed.
    async fn put_version_chunk(&self, room: &str, chunk: ChunkPut) -> AppResult<UploadOutcome> {
        let pinned = self
            .versions
            .begin_or_continue(room, &chunk.file_name)
            .await?;

        let key = (room.to_string(), String::new(), chunk.file_name.clone());

        if let Err(e) = self
            .provider
            .write_at(&pinned.blob_path, chunk.byte_offset, chunk.data.clone())
            .await
        {
            error!(
                room,
                file = %chunk.file_name,
                version = pinned.version,
                error = %e,
                "Chunk write failed, aborting session"
            );
            self.progress.remove(&key);
            self.versions.abort(room, &chunk.file_name, &pinned).await;
            return Err(e);
        }

        if !self.record_chunk(&key, chunk.chunk_index, chunk.total_chunks) {
            return Ok(UploadOutcome::InProgress);
        }
        self.progress.remove(&key);

        let note = chunk.change_note.as_deref().unwrap_or_default();
        self.versions
            .complete(room, &chunk.file_name, pinned.version, note)
            .await?;

        Ok(UploadOutcome::VersionCompleted {
            version: pinned.version,
        })
    }
}
