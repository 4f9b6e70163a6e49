//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use roomdrop_core::config::worker::WorkerConfig;
use roomdrop_core::error::AppError;

use crate::jobs::StagingSweep;

/// Cron-based scheduler for periodic background tasks.
pub struct MaintenanceScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Worker configuration.
    config: WorkerConfig,
    /// Staging sweep job.
    staging_sweep: Arc<StagingSweep>,
}

impl std::fmt::Debug for MaintenanceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceScheduler").finish()
    }
}

impl MaintenanceScheduler {
    /// Create a new maintenance scheduler.
    pub async fn new(config: WorkerConfig, staging_sweep: Arc<StagingSweep>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            config,
            staging_sweep,
        })
    }

    /// Register all default scheduled tasks.
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_staging_sweep().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Maintenance scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Maintenance scheduler shut down");
        Ok(())
    }

    /// Orphan-staging sweep on the configured cron schedule.
    async fn register_staging_sweep(&self) -> Result<(), AppError> {
        let sweep = Arc::clone(&self.staging_sweep);
        let job = CronJob::new_async(
            self.config.staging_sweep_schedule.as_str(),
            move |_uuid, _lock| {
                let sweep = Arc::clone(&sweep);
                Box::pin(async move {
                    match sweep.sweep().await {
                        Ok(removed) if removed > 0 => {
                            tracing::info!(removed, "Staging sweep finished");
                        }
                        Ok(_) => tracing::debug!("Staging sweep found nothing to remove"),
                        Err(e) => tracing::error!("Staging sweep failed: {e}"),
                    }
                })
            },
        )
        .map_err(|e| AppError::internal(format!("Failed to create staging_sweep schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add staging_sweep schedule: {e}")))?;

        tracing::info!(
            schedule = %self.config.staging_sweep_schedule,
            "Registered: staging_sweep"
        );
        Ok(())
    }
}
