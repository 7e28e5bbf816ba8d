use crate::app::App;
use crate::output::Output;
use color_eyre::Result;
use media_acquire_core::{JobRegistry, JobRunner};
use std::sync::Arc;
use tracing::{error, info, warn};

async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;
    Ok(())
}

pub async fn run_daemon(no_startup_run: bool, output: &Output) -> Result<()> {
    let app = App::load()?;
    app.validate()?;
    app.paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create data directories: {}", e))?;

    let run_on_startup = !no_startup_run && app.config.scheduler.run_on_startup;
    let runner: Arc<dyn JobRunner> = Arc::new(app.pipeline());
    let registry = JobRegistry::new(runner).await?.with_cold_start(run_on_startup);

    let specs = app.config.job_specs();
    if specs.is_empty() {
        warn!("No jobs configured: set a schedule and a non-zero quota under [movies] or [shows]");
        output.warn("No jobs configured. Add schedules and quotas to the config file.");
    }

    let mut scheduled = 0;
    for spec in specs {
        let key = spec.key();
        match registry.schedule(spec).await {
            Ok(()) => scheduled += 1,
            Err(e) => {
                error!(job_key = %key, error = %e, "Failed to schedule job");
                output.error(format!("Could not schedule {}: {}", key, e));
            }
        }
    }

    registry.start().await?;
    info!(
        operation = "daemon_started",
        jobs = scheduled,
        run_on_startup,
        config = %app.handle.path().display(),
        "Daemon started"
    );
    output.success(format!("Scheduled {} job(s). Press Ctrl-C to stop.", scheduled));

    shutdown_signal().await?;

    info!(operation = "daemon_stopping", "Shutdown requested");
    output.info("Stopping, waiting for running jobs to finish...");
    registry.shutdown().await?;
    output.success("Stopped");
    Ok(())
}
