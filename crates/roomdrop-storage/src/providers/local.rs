//! Local filesystem storage provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::{AsyncSeekExt, AsyncWriteExt, SeekFrom};
use tokio_util::io::ReaderStream;
use tracing::debug;

use roomdrop_core::error::{AppError, ErrorKind};
use roomdrop_core::result::AppResult;
use roomdrop_core::traits::storage::{ByteStream, StorageObjectMeta, StorageProvider};

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Absolute root of this provider.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = path.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(path);
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open file: {path}"),
                    e,
                )
            }
        })?;

        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream.map(|r| r.map(|b| b.into()))))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path);
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read file: {path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {path}"),
                e,
            )
        })?;

        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn write_at(&self, path: &str, offset: u64, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path);
        self.ensure_parent(&full_path).await?;

        // write(true) without truncate(true): previously written byte ranges
        // survive, which makes retried chunks idempotent.
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .open(&full_path)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open file for positioned write: {path}"),
                    e,
                )
            })?;

        file.seek(SeekFrom::Start(offset)).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to seek to offset {offset} in {path}"),
                e,
            )
        })?;
        file.write_all(&data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write at offset {offset} in {path}"),
                e,
            )
        })?;
        file.flush().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to flush {path}"), e)
        })?;

        debug!(path, offset, bytes = data.len(), "Wrote positioned range");
        Ok(())
    }

    async fn append(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path);
        self.ensure_parent(&full_path).await?;

        let mut file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&full_path)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open file for append: {path}"),
                    e,
                )
            })?;

        file.write_all(&data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to append to {path}"), e)
        })?;
        file.flush().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to flush {path}"), e)
        })?;

        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path);
        if full_path.exists() {
            fs::remove_file(&full_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete file: {path}"),
                    e,
                )
            })?;
        }
        Ok(())
    }

    async fn delete_dir(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path);
        if full_path.exists() {
            fs::remove_dir_all(&full_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete directory: {path}"),
                    e,
                )
            })?;
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path);
        Ok(full_path.exists())
    }

    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta> {
        let full_path = self.resolve(path);
        let meta = fs::metadata(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Path not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to get metadata: {path}"),
                    e,
                )
            }
        })?;

        let name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let last_modified = meta
            .modified()
            .ok()
            .map(chrono::DateTime::<chrono::Utc>::from);

        Ok(StorageObjectMeta {
            path: path.to_string(),
            name,
            size_bytes: meta.len(),
            last_modified,
            is_directory: meta.is_dir(),
        })
    }

    async fn list(&self, path: &str) -> AppResult<Vec<StorageObjectMeta>> {
        let full_path = self.resolve(path);
        if !full_path.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to list directory: {path}"),
                e,
            )
        })?;

        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let entry_meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
            })?;

            let name = entry.file_name().to_string_lossy().to_string();
            let entry_path = if path.is_empty() || path == "/" {
                name.clone()
            } else {
                format!("{}/{}", path.trim_end_matches('/'), name)
            };

            let last_modified = entry_meta
                .modified()
                .ok()
                .map(chrono::DateTime::<chrono::Utc>::from);

            entries.push(StorageObjectMeta {
                path: entry_path,
                name,
                size_bytes: entry_meta.len(),
                last_modified,
                is_directory: entry_meta.is_dir(),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(entries)
    }

    async fn create_dir(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path);
        fs::create_dir_all(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {path}"),
                e,
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        let data = Bytes::from("hello world");
        provider.write("test/file.txt", data.clone()).await.unwrap();

        assert!(provider.exists("test/file.txt").await.unwrap());

        let read_back = provider.read_bytes("test/file.txt").await.unwrap();
        assert_eq!(read_back, data);

        provider.delete("test/file.txt").await.unwrap();
        assert!(!provider.exists("test/file.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_write_at_out_of_order() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        // Offsets 200, 0, 100 with sizes 50/100/100 — arrival order 2, 0, 1.
        provider
            .write_at("blob", 200, Bytes::from(vec![b'c'; 50]))
            .await
            .unwrap();
        provider
            .write_at("blob", 0, Bytes::from(vec![b'a'; 100]))
            .await
            .unwrap();
        provider
            .write_at("blob", 100, Bytes::from(vec![b'b'; 100]))
            .await
            .unwrap();

        let blob = provider.read_bytes("blob").await.unwrap();
        assert_eq!(blob.len(), 250);
        assert!(blob[..100].iter().all(|&b| b == b'a'));
        assert!(blob[100..200].iter().all(|&b| b == b'b'));
        assert!(blob[200..].iter().all(|&b| b == b'c'));
    }

    #[tokio::test]
    async fn test_write_at_retry_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        provider
            .write_at("blob", 0, Bytes::from("aaaa"))
            .await
            .unwrap();
        provider
            .write_at("blob", 4, Bytes::from("bbbb"))
            .await
            .unwrap();
        // Retransmit of the first chunk must not truncate the second.
        provider
            .write_at("blob", 0, Bytes::from("aaaa"))
            .await
            .unwrap();

        let blob = provider.read_bytes("blob").await.unwrap();
        assert_eq!(&blob[..], b"aaaabbbb");
    }

    #[tokio::test]
    async fn test_append_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        provider.append("log", Bytes::from("one\n")).await.unwrap();
        provider.append("log", Bytes::from("two\n")).await.unwrap();

        let log = provider.read_bytes("log").await.unwrap();
        assert_eq!(&log[..], b"one\ntwo\n");
    }

    #[tokio::test]
    async fn test_list_and_delete_dir() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        provider
            .write("listdir/a.txt", Bytes::from("a"))
            .await
            .unwrap();
        provider
            .write("listdir/b.txt", Bytes::from("b"))
            .await
            .unwrap();
        provider.create_dir("listdir/subdir").await.unwrap();

        let entries = provider.list("listdir").await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries.iter().filter(|e| e.is_directory).count(), 1);

        provider.delete_dir("listdir").await.unwrap();
        assert!(!provider.exists("listdir").await.unwrap());
        // Deleting again is a no-op, not an error.
        provider.delete_dir("listdir").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        assert!(provider.list("nowhere").await.unwrap().is_empty());
    }
}
