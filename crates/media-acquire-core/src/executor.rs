use chrono::Utc;
use media_acquire_models::{
    AcquiredMediaRecord, CandidateItem, Enrichment, MediaKind, NotificationEvent, NotificationKind,
    Outcome, SubmitStatus,
};
use media_acquire_sources::{AppendStatus, HistoryStore, MetadataEnricher, SourceError};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::{NotificationDispatcher, PreparedBackend};

/// Submits one item and runs the follow-up work for confirmed requests.
///
/// Follow-up (enrichment, history, notifications) is best-effort: its failures
/// are logged and never change the outcome of the request itself.
pub struct RequestExecutor {
    enricher: Arc<dyn MetadataEnricher>,
    history: Arc<dyn HistoryStore>,
    dispatcher: NotificationDispatcher,
}

impl RequestExecutor {
    pub fn new(enricher: Arc<dyn MetadataEnricher>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            enricher,
            history,
            dispatcher: NotificationDispatcher::default(),
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: NotificationDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub async fn execute(&self, item: &CandidateItem, backend: &PreparedBackend) -> Outcome {
        let label = item.label();
        let request = match backend.to_request(item) {
            Ok(request) => request,
            Err(reason) => {
                warn!(
                    operation = "request_skipped",
                    title = %label,
                    reason = %reason,
                    "Cannot request item"
                );
                return Outcome::Failed(reason);
            }
        };

        match backend.submit(&request).await {
            Ok(SubmitStatus::Created) => {
                info!(
                    operation = "request_created",
                    title = %label,
                    mode = %backend.mode(),
                    "Requested"
                );
                self.follow_up(item, backend.kind()).await;
                Outcome::Requested
            }
            Ok(SubmitStatus::AlreadyExists) => {
                warn!(
                    operation = "request_exists",
                    title = %label,
                    mode = %backend.mode(),
                    "Already requested or in library"
                );
                Outcome::AlreadyExists
            }
            Err(e) => {
                error!(
                    operation = "request_failed",
                    title = %label,
                    mode = %backend.mode(),
                    error = %e,
                    "Request failed"
                );
                Outcome::Failed(e.to_string())
            }
        }
    }

    async fn follow_up(&self, item: &CandidateItem, kind: MediaKind) {
        let enrichment = self.enrich(item).await;

        let title = if item.title.is_empty() {
            enrichment.title.clone()
        } else {
            item.title.clone()
        };
        let summary = if enrichment.summary.is_empty() {
            item.overview.clone().unwrap_or_default()
        } else {
            enrichment.summary.clone()
        };

        let record = AcquiredMediaRecord {
            kind,
            title: title.clone(),
            year: item.year,
            summary: summary.clone(),
            imdb_id: item.ids.imdb.clone(),
            poster_url: enrichment.poster.clone(),
            added_at: Utc::now(),
        };
        match self.history.append(&record).await {
            Ok(AppendStatus::Inserted) => {
                debug!(operation = "history_append", title = %title, "Recorded acquisition")
            }
            Ok(AppendStatus::Duplicate) => {
                debug!(operation = "history_append", title = %title, "Already in history")
            }
            Err(e) => error!(
                operation = "history_failed",
                title = %title,
                error = %e,
                "Failed to record acquisition"
            ),
        }

        let event = NotificationEvent {
            kind: NotificationKind::for_media(kind),
            title,
            year: item.year,
            overview: summary,
            genres: item.genres.clone(),
            rating: item.rating,
            imdb_id: item.ids.imdb.clone(),
            poster_url: enrichment.poster,
        };
        self.dispatcher.fan_out(&event).await;
    }

    async fn enrich(&self, item: &CandidateItem) -> Enrichment {
        let Some(imdb_id) = item.ids.imdb.as_deref() else {
            return Enrichment::default();
        };
        match self.enricher.fetch(imdb_id).await {
            Ok(enrichment) => enrichment,
            Err(SourceError::NotConfigured(what)) => {
                debug!(missing = %what, "Metadata enrichment not configured");
                Enrichment::default()
            }
            Err(e) => {
                error!(
                    operation = "enrichment_failed",
                    imdb_id = %imdb_id,
                    error = %e,
                    "Metadata lookup failed"
                );
                Enrichment::default()
            }
        }
    }
}
