//! Cron-driven job registry.
//!
//! One live entry per job key. Every trigger (cron tick, cold start, on-demand)
//! goes through the same per-key run slot, so two runs of one key never overlap.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use media_acquire_models::{normalize_cron, JobKey, JobRunRecord, ListJobSpec, RunDisposition};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify, Semaphore};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::RegistryError;

/// The work bound to every job key
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// `stop` flips to true once shutdown begins; runners check it between items
    async fn run_job(&self, key: JobKey, stop: Arc<AtomicBool>) -> RunDisposition;
}

struct JobEntry {
    spec: ListJobSpec,
    job_id: Uuid,
    cron: String,
}

struct RegistryInner {
    runner: Arc<dyn JobRunner>,
    entries: Mutex<HashMap<JobKey, JobEntry>>,
    slots: Mutex<HashMap<JobKey, Arc<Semaphore>>>,
    last_runs: Mutex<HashMap<JobKey, DateTime<Utc>>>,
    stopping: Arc<AtomicBool>,
    in_flight: AtomicUsize,
    idle: Notify,
}

/// Counts a trigger as in flight until dropped
struct InFlight<'a>(&'a RegistryInner);

impl<'a> InFlight<'a> {
    fn enter(inner: &'a RegistryInner) -> Self {
        inner.in_flight.fetch_add(1, Ordering::SeqCst);
        Self(inner)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.0.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

impl RegistryInner {
    async fn slot(&self, key: JobKey) -> Arc<Semaphore> {
        self.slots
            .lock()
            .await
            .entry(key)
            .or_insert_with(|| Arc::new(Semaphore::new(1)))
            .clone()
    }

    async fn trigger(&self, key: JobKey) -> RunDisposition {
        let _in_flight = InFlight::enter(self);
        if self.stopping.load(Ordering::SeqCst) {
            debug!(job_key = %key, "Shutdown in progress, not starting run");
            return RunDisposition::ShuttingDown;
        }

        let Ok(_permit) = self.slot(key).await.try_acquire_owned() else {
            info!(
                operation = "job_busy",
                job_key = %key,
                "Previous run still in progress, skipping trigger"
            );
            return RunDisposition::Busy;
        };

        self.last_runs.lock().await.insert(key, Utc::now());
        let disposition = self.runner.run_job(key, self.stopping.clone()).await;
        debug!(job_key = %key, disposition = ?disposition, "Run finished");
        disposition
    }

    async fn wait_idle(&self) {
        loop {
            let idle = self.idle.notified();
            if self.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            idle.await;
        }
    }
}

fn scheduler_error(e: JobSchedulerError) -> RegistryError {
    RegistryError::Scheduler(format!("{:?}", e))
}

pub struct JobRegistry {
    scheduler: JobScheduler,
    inner: Arc<RegistryInner>,
    cold_start: bool,
}

impl JobRegistry {
    pub async fn new(runner: Arc<dyn JobRunner>) -> Result<Self, RegistryError> {
        let scheduler = JobScheduler::new().await.map_err(scheduler_error)?;
        Ok(Self {
            scheduler,
            inner: Arc::new(RegistryInner {
                runner,
                entries: Mutex::new(HashMap::new()),
                slots: Mutex::new(HashMap::new()),
                last_runs: Mutex::new(HashMap::new()),
                stopping: Arc::new(AtomicBool::new(false)),
                in_flight: AtomicUsize::new(0),
                idle: Notify::new(),
            }),
            cold_start: true,
        })
    }

    /// Whether a successful schedule also runs the job once right away
    pub fn with_cold_start(mut self, cold_start: bool) -> Self {
        self.cold_start = cold_start;
        self
    }

    /// Schedule a job, atomically replacing any existing entry for its key
    pub async fn schedule(&self, spec: ListJobSpec) -> Result<(), RegistryError> {
        let key = spec.key();
        if !key.is_supported() {
            return Err(RegistryError::UnsupportedJob(key));
        }
        if spec.quota == 0 {
            return Err(RegistryError::ZeroQuota(key));
        }
        let cron = normalize_cron(&spec.cron).map_err(|message| RegistryError::InvalidCron {
            key,
            cron: spec.cron.clone(),
            message,
        })?;

        let inner = self.inner.clone();
        let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
            let inner = inner.clone();
            Box::pin(async move {
                inner.trigger(key).await;
            })
        })
        .map_err(|e| RegistryError::InvalidCron {
            key,
            cron: spec.cron.clone(),
            message: format!("{:?}", e),
        })?;

        {
            let mut entries = self.inner.entries.lock().await;
            if let Some(old) = entries.remove(&key) {
                self.scheduler
                    .remove(&old.job_id)
                    .await
                    .map_err(scheduler_error)?;
                debug!(job_key = %key, old_cron = %old.cron, "Removed previous entry");
            }
            let job_id = self.scheduler.add(job).await.map_err(scheduler_error)?;
            info!(
                operation = "job_scheduled",
                job_key = %key,
                cron = %cron,
                quota = spec.quota,
                "Scheduled job"
            );
            entries.insert(key, JobEntry { spec, job_id, cron });
        }

        if self.cold_start {
            let inner = self.inner.clone();
            tokio::spawn(async move {
                inner.trigger(key).await;
            });
        }
        Ok(())
    }

    pub async fn reschedule(&self, spec: ListJobSpec) -> Result<(), RegistryError> {
        self.schedule(spec).await
    }

    /// Remove the entry for `key`; returns false when nothing was scheduled
    pub async fn stop(&self, key: JobKey) -> Result<bool, RegistryError> {
        let mut entries = self.inner.entries.lock().await;
        let Some(entry) = entries.remove(&key) else {
            info!(job_key = %key, "Stop requested for a job that is not scheduled");
            return Ok(false);
        };
        self.scheduler
            .remove(&entry.job_id)
            .await
            .map_err(scheduler_error)?;
        info!(operation = "job_stopped", job_key = %key, "Stopped job");
        Ok(true)
    }

    /// Run a scheduled job now, outside its cron cadence
    pub async fn run_on_demand(&self, key: JobKey) -> Result<RunDisposition, RegistryError> {
        if !self.inner.entries.lock().await.contains_key(&key) {
            return Err(RegistryError::UnknownJob(key));
        }
        Ok(self.inner.trigger(key).await)
    }

    pub async fn status(&self) -> Vec<JobRunRecord> {
        let entries = self.inner.entries.lock().await;
        let last_runs = self.inner.last_runs.lock().await.clone();
        let mut scheduler = self.scheduler.clone();

        let mut records = Vec::with_capacity(entries.len());
        for (key, entry) in entries.iter() {
            let next_run = match scheduler.next_tick_for_job(entry.job_id).await {
                Ok(next) => next,
                Err(e) => {
                    warn!(job_key = %key, error = ?e, "Could not read next tick");
                    None
                }
            };
            records.push(JobRunRecord {
                job_id: entry.job_id.to_string(),
                key: *key,
                kind: key.kind,
                list: key.list,
                last_run: last_runs.get(key).copied(),
                next_run,
                cron: entry.cron.clone(),
            });
        }
        records.sort_by_key(|r| r.key.to_string());
        records
    }

    pub async fn start(&self) -> Result<(), RegistryError> {
        self.scheduler.start().await.map_err(scheduler_error)?;
        info!("Scheduler started");
        Ok(())
    }

    /// Stop the timer, refuse new runs, and wait for in-flight runs to return
    pub async fn shutdown(&self) -> Result<(), RegistryError> {
        self.inner.stopping.store(true, Ordering::SeqCst);
        let mut scheduler = self.scheduler.clone();
        if let Err(e) = scheduler.shutdown().await {
            error!(error = ?e, "Scheduler did not shut down cleanly");
        }
        let in_flight = self.inner.in_flight.load(Ordering::SeqCst);
        if in_flight > 0 {
            info!(in_flight, "Waiting for running jobs to finish");
        }
        self.inner.wait_idle().await;
        info!("Scheduler stopped");
        Ok(())
    }
}
