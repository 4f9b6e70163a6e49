//! Version download resolution.

use std::sync::Arc;

use bytes::Bytes;

use roomdrop_core::error::AppError;
use roomdrop_core::result::AppResult;
use roomdrop_core::traits::storage::StorageProvider;
use roomdrop_core::types::encode_display_name;
use roomdrop_storage::layout;

use super::version::VersionStore;

/// A resolved version blob, ready to be served under its display name.
#[derive(Debug, Clone)]
pub struct VersionDownload {
    /// Display name the blob should be served as.
    pub display_name: String,
    /// Version number of the blob.
    pub version: u64,
    /// The raw blob bytes.
    pub data: Bytes,
}

/// Resolves version blobs for download.
#[derive(Debug)]
pub struct DownloadService {
    /// Provider owning room storage.
    provider: Arc<dyn StorageProvider>,
    /// Version store for entry lookup.
    versions: Arc<VersionStore>,
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(provider: Arc<dyn StorageProvider>, versions: Arc<VersionStore>) -> Self {
        Self { provider, versions }
    }

    /// Fetch a target's version blob by number, or the latest when `None`.
    ///
    /// The blob is returned with the target's display name restored, so the
    /// caller can serve `3.pdf` back as `report.pdf`.
    pub async fn fetch_version(
        &self,
        room: &str,
        display: &str,
        version: Option<u64>,
    ) -> AppResult<VersionDownload> {
        let entries = self.versions.list_versions(room, display).await?;

        let entry = match version {
            Some(requested) => entries.into_iter().find(|e| e.number == requested),
            None => entries.into_iter().last(),
        }
        .ok_or_else(|| {
            AppError::not_found(format!("No such version of '{display}' in room '{room}'"))
        })?;

        let folder = encode_display_name(display)?;
        let data = self
            .provider
            .read_bytes(&layout::version_blob(room, &folder, &entry.file_name))
            .await?;

        Ok(VersionDownload {
            display_name: display.to_string(),
            version: entry.number,
            data,
        })
    }
}
