//! File domain entities.

pub mod chunk;
pub mod version;

pub use chunk::{ChunkPut, UploadMode, UploadOutcome};
pub use version::VersionEntry;
