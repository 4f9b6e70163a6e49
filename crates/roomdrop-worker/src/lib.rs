//! Background maintenance for Roomdrop.
//!
//! This crate provides:
//! - A cron scheduler for periodic maintenance tasks
//! - The orphan-staging sweep that reclaims abandoned archive batches

pub mod jobs;
pub mod scheduler;

pub use jobs::StagingSweep;
pub use scheduler::MaintenanceScheduler;
