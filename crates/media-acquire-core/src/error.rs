use media_acquire_models::JobKey;
use media_acquire_sources::SourceError;
use thiserror::Error;

/// Errors that end a pipeline run before any item is attempted
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Settings unreadable, backend missing, or quality profile/root folder unresolved
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Catalog fetch failed: {0}")]
    Catalog(#[source] SourceError),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("No job is scheduled for '{0}'")]
    UnknownJob(JobKey),

    #[error("The catalog has no list for '{0}'")]
    UnsupportedJob(JobKey),

    #[error("Refusing to schedule '{0}' with a quota of zero")]
    ZeroQuota(JobKey),

    #[error("Invalid cron expression '{cron}' for '{key}': {message}")]
    InvalidCron {
        key: JobKey,
        cron: String,
        message: String,
    },

    #[error("Scheduler error: {0}")]
    Scheduler(String),
}
