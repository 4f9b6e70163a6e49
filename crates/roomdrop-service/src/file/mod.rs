//! File ingestion: chunked uploads, version control, downloads.

pub mod download;
pub mod upload;
pub mod version;

pub use download::{DownloadService, VersionDownload};
pub use upload::UploadService;
pub use version::{PinnedVersion, VersionStore};
