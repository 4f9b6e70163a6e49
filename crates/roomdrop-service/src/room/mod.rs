//! Room lifecycle: registry, expiry scheduling, and orchestration.

pub mod registry;
pub mod scheduler;
pub mod service;

pub use registry::RoomRegistry;
pub use scheduler::ExpiryScheduler;
pub use service::RoomService;
