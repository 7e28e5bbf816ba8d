use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{JobKey, ListType, MediaKind};

/// One schedulable unit. Replaced, never mutated, on reschedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListJobSpec {
    pub kind: MediaKind,
    pub list: ListType,
    pub cron: String,
    pub quota: u32,
}

impl ListJobSpec {
    pub fn new(kind: MediaKind, list: ListType, cron: impl Into<String>, quota: u32) -> Self {
        Self {
            kind,
            list,
            cron: cron.into(),
            quota,
        }
    }

    pub fn key(&self) -> JobKey {
        JobKey::new(self.kind, self.list)
    }
}

/// Snapshot of a scheduled job as exposed to status queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRunRecord {
    pub job_id: String,
    pub key: JobKey,
    pub kind: MediaKind,
    pub list: ListType,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub cron: String,
}

/// Counters for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunReport {
    pub job_key: JobKey,
    pub fetched: usize,
    pub selected: usize,
    pub requested: usize,
    pub already_exists: usize,
    pub failed: usize,
    /// Selected items never attempted because shutdown was requested
    pub skipped: usize,
}

impl RunReport {
    pub fn empty(job_key: JobKey) -> Self {
        Self {
            job_key,
            fetched: 0,
            selected: 0,
            requested: 0,
            already_exists: 0,
            failed: 0,
            skipped: 0,
        }
    }
}

/// What happened when a run was triggered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunDisposition {
    Completed { report: RunReport },
    /// Prerequisite missing (no catalog credentials, zero quota); nothing done
    Skipped { reason: String },
    /// Another run of the same key was in progress
    Busy,
    /// Shutdown in progress
    ShuttingDown,
    /// Run aborted early (configuration error, catalog failure)
    Failed { reason: String },
}
