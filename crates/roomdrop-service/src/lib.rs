//! # roomdrop-service
//!
//! Business logic service layer for Roomdrop. Each service orchestrates the
//! storage provider and the in-memory session tables to implement
//! application-level use cases: room lifecycle, message posting, chunked
//! uploads with version control, archive batching, and the content feed.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod feed;
pub mod file;
pub mod message;
pub mod room;

pub use feed::FeedService;
pub use file::{DownloadService, UploadService, VersionStore};
pub use message::MessageService;
pub use room::{ExpiryScheduler, RoomRegistry, RoomService};
