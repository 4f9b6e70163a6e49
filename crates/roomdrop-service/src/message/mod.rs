//! Room message posting.

pub mod service;

pub use service::MessageService;
