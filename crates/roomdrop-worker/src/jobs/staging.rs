//! Orphan-staging sweep.
//!
//! Archive batches whose uploader went away leave staging directories
//! behind; the sweep removes any batch directory that has not been touched
//! within the configured age.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use roomdrop_core::result::AppResult;
use roomdrop_core::traits::storage::StorageProvider;
use roomdrop_storage::layout;

/// Removes stale archive staging directories.
#[derive(Debug)]
pub struct StagingSweep {
    /// Provider owning the staging area.
    provider: Arc<dyn StorageProvider>,
    /// Age beyond which an untouched batch is considered abandoned.
    max_age: Duration,
}

impl StagingSweep {
    /// Creates a new staging sweep.
    pub fn new(provider: Arc<dyn StorageProvider>, max_age_seconds: u64) -> Self {
        Self {
            provider,
            max_age: Duration::seconds(max_age_seconds as i64),
        }
    }

    /// Run one sweep over `_staging/<room>/<batch>` directories. Returns
    /// the number of batch directories removed.
    pub async fn sweep(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - self.max_age;
        let mut removed = 0u64;

        for room in self.provider.list(layout::STAGING_DIR).await? {
            if !room.is_directory {
                continue;
            }
            for batch in self.provider.list(&room.path).await? {
                if !batch.is_directory {
                    continue;
                }
                let stale = batch
                    .last_modified
                    .map(|modified| modified < cutoff)
                    .unwrap_or(false);
                if !stale {
                    continue;
                }
                match self.provider.delete_dir(&batch.path).await {
                    Ok(()) => {
                        info!(path = %batch.path, "Swept abandoned staging batch");
                        removed += 1;
                    }
                    Err(e) => {
                        warn!(path = %batch.path, error = %e, "Failed to sweep staging batch")
                    }
                }
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use roomdrop_storage::LocalStorageProvider;

    #[tokio::test]
    async fn test_sweep_spares_fresh_batches() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(
            LocalStorageProvider::new(dir.path().to_str().unwrap())
                .await
                .unwrap(),
        );
        provider
            .write("_staging/alpha/bundle/a.txt", Bytes::from("a"))
            .await
            .unwrap();

        let sweep = StagingSweep::new(provider.clone(), 3600);
        assert_eq!(sweep.sweep().await.unwrap(), 0);
        assert!(provider.exists("_staging/alpha/bundle").await.unwrap());
    }

    #[tokio::test]
    async fn test_sweep_removes_stale_batches() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(
            LocalStorageProvider::new(dir.path().to_str().unwrap())
                .await
                .unwrap(),
        );
        provider
            .write("_staging/alpha/bundle/a.txt", Bytes::from("a"))
            .await
            .unwrap();

        // Zero max age: everything with a modification time is stale.
        let sweep = StagingSweep::new(provider.clone(), 0);
        assert_eq!(sweep.sweep().await.unwrap(), 1);
        assert!(!provider.exists("_staging/alpha/bundle").await.unwrap());
    }
}
