//! Chunked upload value objects.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// How an incoming chunk should be routed once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadMode {
    /// The file becomes (or extends) a versioned artifact in the room.
    Version,
    /// The file is staged into an archive batch; the batch is bundled into a
    /// single `.tar.gz` once all declared files complete.
    Archive {
        /// Batch name; also the stem of the final archive file.
        batch: String,
        /// Number of files declared for this batch.
        declared_files: u32,
    },
}

/// A single byte-range fragment of an upload.
///
/// Chunks may arrive out of order or be retried; the byte offset makes the
/// write idempotent. The carrying file is complete once all
/// `total_chunks` declared indices have been satisfied.
#[derive(Debug, Clone)]
pub struct ChunkPut {
    /// Display name of the file this chunk belongs to.
    pub file_name: String,
    /// 0-based index of this chunk.
    pub chunk_index: u32,
    /// Total number of chunks declared for the file.
    pub total_chunks: u32,
    /// Byte offset of this chunk's payload within the file.
    pub byte_offset: u64,
    /// The payload bytes.
    pub data: Bytes,
    /// Upload mode (version control or archive staging).
    pub mode: UploadMode,
    /// Change note recorded when the version completes.
    /// Ignored in archive mode.
    pub change_note: Option<String>,
}

/// Outcome of ingesting one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadOutcome {
    /// More chunks of this file are still expected.
    InProgress,
    /// The last outstanding chunk of a version landed and its change note
    /// was logged.
    VersionCompleted {
        /// The version number the upload was written into.
        version: u64,
    },
    /// A staged file completed but the batch is still waiting on others.
    ArchiveStaged {
        /// Files currently complete in the staging directory.
        staged: u32,
        /// Files declared for the batch.
        declared: u32,
    },
    /// The last declared file completed and the bundle was materialized.
    ArchiveCompleted {
        /// File name of the bundle within the room directory.
        archive_name: String,
    },
}
