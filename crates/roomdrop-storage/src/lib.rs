//! # roomdrop-storage
//!
//! Storage layer for Roomdrop: the local filesystem provider, room storage
//! layout helpers, and tar.gz archive bundling.

pub mod archive;
pub mod layout;
pub mod providers;

pub use archive::ArchiveBuilder;
pub use providers::local::LocalStorageProvider;
