//! Archive bundling — compresses a completed staging directory into a
//! single `.tar.gz` inside the room directory.

use std::fs::File;
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;

use roomdrop_core::error::{AppError, ErrorKind};
use roomdrop_core::result::AppResult;

use crate::layout;

/// Builds compressed bundles out of fully staged archive batches.
///
/// The builder works on absolute paths below the storage root because tar
/// construction is synchronous; it runs on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    /// Absolute storage root (same root the provider is mounted on).
    root: PathBuf,
}

impl ArchiveBuilder {
    /// Create a new archive builder over the given storage root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Compress the staging directory of `(room, batch)` into
    /// `rooms/<room>/<batch>.tar.gz` and delete the staging directory.
    ///
    /// The bundle only appears in the room once fully written, so a feed
    /// reader never observes a partial archive. Returns the bundle's file
    /// name within the room.
    pub async fn bundle(&self, room: &str, batch: &str) -> AppResult<String> {
        let staging = self.root.join(layout::staging_dir(room, batch));
        let archive = self.root.join(layout::archive_file(room, batch));
        let batch_owned = batch.to_string();

        let staging_for_tar = staging.clone();
        let archive_for_tar = archive.clone();
        tokio::task::spawn_blocking(move || -> AppResult<()> {
            let file = File::create(&archive_for_tar).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create archive {}", archive_for_tar.display()),
                    e,
                )
            })?;
            let encoder = GzEncoder::new(file, Compression::default());
            let mut builder = tar::Builder::new(encoder);

            builder
                .append_dir_all(&batch_owned, &staging_for_tar)
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to add staged files for batch '{batch_owned}'"),
                        e,
                    )
                })?;

            let encoder = builder.into_inner().map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to finish tar stream", e)
            })?;
            encoder.finish().map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to finish gzip stream", e)
            })?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::internal(format!("Archive task panicked: {e}")))??;

        tokio::fs::remove_dir_all(&staging).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to remove staging dir {}", staging.display()),
                e,
            )
        })?;

        let archive_name = format!("{batch}.tar.gz");
        info!(room, batch, archive = %archive_name, "Archive bundle materialized");
        Ok(archive_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;

    #[tokio::test]
    async fn test_bundle_and_staging_removal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let staging = root.join("_staging/alpha/bundle");
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::create_dir_all(root.join("rooms/alpha")).unwrap();
        std::fs::write(staging.join("a.txt"), b"first").unwrap();
        std::fs::write(staging.join("b.txt"), b"second").unwrap();

        let builder = ArchiveBuilder::new(root);
        let name = builder.bundle("alpha", "bundle").await.unwrap();
        assert_eq!(name, "bundle.tar.gz");

        let archive_path = root.join("rooms/alpha/bundle.tar.gz");
        assert!(archive_path.exists());
        assert!(!staging.exists());

        // The tarball holds both staged files under the batch name.
        let tar_gz = std::fs::File::open(&archive_path).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(tar_gz));
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&"bundle/a.txt".to_string()));
        assert!(names.contains(&"bundle/b.txt".to_string()));
    }
}
