//! Maintenance job implementations.

pub mod staging;

pub use staging::StagingSweep;
