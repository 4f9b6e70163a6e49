//! Shared fixture building a full service stack over a temp directory.

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use tempfile::TempDir;

use roomdrop_core::config::rooms::RoomConfig;
use roomdrop_core::config::storage::StorageConfig;
use roomdrop_core::traits::storage::StorageProvider;
use roomdrop_entity::file::{ChunkPut, UploadMode, UploadOutcome};
use roomdrop_entity::room::{CreateRoom, Room};
use roomdrop_service::{
    DownloadService, ExpiryScheduler, FeedService, MessageService, RoomRegistry, RoomService,
    UploadService, VersionStore,
};
use roomdrop_storage::{ArchiveBuilder, LocalStorageProvider};

/// TTL high enough to hit the never-expires threshold.
pub const NEVER_EXPIRES: u64 = 99_999;

/// A complete service stack over a temporary storage root.
pub struct TestStack {
    _tmp: TempDir,
    pub provider: Arc<dyn StorageProvider>,
    pub registry: Arc<RoomRegistry>,
    pub scheduler: Arc<ExpiryScheduler>,
    pub rooms: RoomService,
    pub versions: Arc<VersionStore>,
    pub uploads: UploadService,
    pub downloads: DownloadService,
    pub messages: MessageService,
    pub feed: FeedService,
}

impl TestStack {
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();

        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_str().unwrap();

        let provider: Arc<dyn StorageProvider> =
            Arc::new(LocalStorageProvider::new(root).await.unwrap());
        let registry = Arc::new(RoomRegistry::new(Arc::clone(&provider)));
        let scheduler = Arc::new(ExpiryScheduler::new(
            Arc::clone(&registry),
            Arc::clone(&provider),
        ));
        let rooms = RoomService::new(
            Arc::clone(&registry),
            Arc::clone(&scheduler),
            Arc::clone(&provider),
            RoomConfig::default(),
        );
        let versions = Arc::new(VersionStore::new(Arc::clone(&provider)));
        let uploads = UploadService::new(
            Arc::clone(&provider),
            Arc::clone(&versions),
            ArchiveBuilder::new(tmp.path()),
            StorageConfig::default(),
        );
        let downloads = DownloadService::new(Arc::clone(&provider), Arc::clone(&versions));
        let messages = MessageService::new(Arc::clone(&provider));
        let feed = FeedService::new(Arc::clone(&provider));

        Self {
            _tmp: tmp,
            provider,
            registry,
            scheduler,
            rooms,
            versions,
            uploads,
            downloads,
            messages,
            feed,
        }
    }

    /// Create a never-expiring public room.
    pub async fn room(&self, name: &str) -> Room {
        self.rooms
            .create_room(CreateRoom {
                name: name.to_string(),
                passcode: String::new(),
                ttl_seconds: NEVER_EXPIRES,
            })
            .await
            .unwrap()
    }

    /// Build a version-mode chunk.
    pub fn version_chunk(
        file: &str,
        index: u32,
        total: u32,
        offset: u64,
        data: &[u8],
        note: Option<&str>,
    ) -> ChunkPut {
        ChunkPut {
            file_name: file.to_string(),
            chunk_index: index,
            total_chunks: total,
            byte_offset: offset,
            data: Bytes::copy_from_slice(data),
            mode: UploadMode::Version,
            change_note: note.map(String::from),
        }
    }

    /// Build an archive-mode chunk.
    pub fn archive_chunk(
        file: &str,
        batch: &str,
        declared_files: u32,
        index: u32,
        total: u32,
        offset: u64,
        data: &[u8],
    ) -> ChunkPut {
        ChunkPut {
            file_name: file.to_string(),
            chunk_index: index,
            total_chunks: total,
            byte_offset: offset,
            data: Bytes::copy_from_slice(data),
            mode: UploadMode::Archive {
                batch: batch.to_string(),
                declared_files,
            },
            change_note: None,
        }
    }

    /// Upload a whole file as a single version-mode chunk and assert it
    /// completed. Returns the version number it landed in.
    pub async fn upload_version(&self, room: &str, file: &str, data: &[u8], note: &str) -> u64 {
        let outcome = self
            .uploads
            .put_chunk(room, Self::version_chunk(file, 0, 1, 0, data, Some(note)))
            .await
            .unwrap();
        match outcome {
            UploadOutcome::VersionCompleted { version } => version,
            other => panic!("expected VersionCompleted, got {other:?}"),
        }
    }
}
