//! # roomdrop-entity
//!
//! Domain entity models for Roomdrop. Every struct in this crate represents
//! a durable artifact in room storage or a domain value object passed
//! between the service layer and its callers. Entities derive `Debug`,
//! `Clone`, `Serialize`, and `Deserialize`; request value objects carrying
//! raw payload bytes derive only `Debug` and `Clone`.

pub mod feed;
pub mod file;
pub mod message;
pub mod room;

pub use feed::{FeedEntry, FeedSnapshot, DELETED_LABEL};
pub use file::{ChunkPut, UploadMode, UploadOutcome, VersionEntry};
pub use message::Message;
pub use room::{CreateRoom, Room};
