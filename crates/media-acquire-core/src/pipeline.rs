use async_trait::async_trait;
use chrono::{Datelike, Utc};
use media_acquire_models::{JobKey, Outcome, RunDisposition, RunReport};
use media_acquire_sources::{BackendFactory, CandidateSource, SettingsStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::{build_catalog_query, filter, route, JobRunner, PipelineError, RequestExecutor};

/// Result of a run that was allowed to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineRun {
    Completed(RunReport),
    /// A prerequisite was missing; nothing was fetched or requested
    Skipped(String),
}

/// Fetch → filter → route → execute for one job key.
///
/// Settings and backend configuration are read once, fresh, at the start of every run.
pub struct ListPipeline {
    catalog: Arc<dyn CandidateSource>,
    settings: Arc<dyn SettingsStore>,
    factory: Arc<dyn BackendFactory>,
    executor: RequestExecutor,
}

impl ListPipeline {
    pub fn new(
        catalog: Arc<dyn CandidateSource>,
        settings: Arc<dyn SettingsStore>,
        factory: Arc<dyn BackendFactory>,
        executor: RequestExecutor,
    ) -> Self {
        Self {
            catalog,
            settings,
            factory,
            executor,
        }
    }

    #[instrument(skip(self, key, stop), fields(job_key = %key))]
    pub async fn run(&self, key: JobKey, stop: &AtomicBool) -> Result<PipelineRun, PipelineError> {
        let start = Instant::now();

        if let Err(e) = self.catalog.ping().await {
            if !e.is_missing_prerequisite() {
                return Err(PipelineError::Catalog(e));
            }
            warn!(
                operation = "catalog_credentials_missing",
                error = %e,
                "Catalog unavailable, skipping run"
            );
            return Ok(PipelineRun::Skipped(e.to_string()));
        }

        let snapshot = self
            .settings
            .snapshot(key.kind)
            .await
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;
        let settings = &snapshot.list;
        let quota = settings.quota(key.list);
        if quota == 0 {
            info!("Quota is zero, nothing to do");
            return Ok(PipelineRun::Skipped(format!("quota for {} is zero", key)));
        }

        let query = build_catalog_query(
            key.list,
            &settings.rules,
            snapshot.fetch_limit,
            Utc::now().year(),
        );
        debug!(query = ?query, "Fetching candidates");
        let candidates = self
            .catalog
            .fetch(key.kind, key.list, &query)
            .await
            .map_err(PipelineError::Catalog)?;

        let mut report = RunReport::empty(key);
        report.fetched = candidates.len();
        let selected = filter::reduce(candidates, &settings.rules, key.kind, quota as usize);
        report.selected = selected.len();
        info!(
            fetched = report.fetched,
            selected = report.selected,
            quota,
            "Filtered candidates"
        );
        if selected.is_empty() {
            return Ok(PipelineRun::Completed(report));
        }

        let backend_config = snapshot
            .backend
            .as_ref()
            .map_err(|reason| PipelineError::Configuration(reason.clone()))?;
        let backend = route(key.kind, backend_config, self.factory.as_ref()).await?;

        for (index, item) in selected.iter().enumerate() {
            if stop.load(Ordering::SeqCst) {
                report.skipped = selected.len() - index;
                warn!(skipped = report.skipped, "Shutdown requested, leaving remaining items");
                break;
            }
            match self.executor.execute(item, &backend).await {
                Outcome::Requested => report.requested += 1,
                Outcome::AlreadyExists => report.already_exists += 1,
                Outcome::Failed(_) => report.failed += 1,
            }
        }

        info!(
            operation = "run_complete",
            mode = %backend.mode(),
            requested = report.requested,
            already_exists = report.already_exists,
            failed = report.failed,
            skipped = report.skipped,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Run complete"
        );
        Ok(PipelineRun::Completed(report))
    }
}

#[async_trait]
impl JobRunner for ListPipeline {
    async fn run_job(&self, key: JobKey, stop: Arc<AtomicBool>) -> RunDisposition {
        match self.run(key, &stop).await {
            Ok(PipelineRun::Completed(report)) => RunDisposition::Completed { report },
            Ok(PipelineRun::Skipped(reason)) => RunDisposition::Skipped { reason },
            Err(e) => {
                error!(job_key = %key, error = %e, "Run aborted");
                RunDisposition::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        broker_config, candidate, list_settings, manager_config, CountingProvider, FakeCatalog,
        FakeEnricher, FakeFactory, FakeSettings, MemoryHistory,
    };
    use crate::NotificationDispatcher;
    use media_acquire_models::{AcquisitionBackendConfig, CandidateItem, ListType, MediaKind};

    struct Fixture {
        catalog: Arc<FakeCatalog>,
        settings: Arc<FakeSettings>,
        factory: Arc<FakeFactory>,
        history: Arc<MemoryHistory>,
        provider: Arc<CountingProvider>,
        pipeline: ListPipeline,
    }

    fn fixture(catalog: FakeCatalog, quota: u32, backend: AcquisitionBackendConfig) -> Fixture {
        let catalog = Arc::new(catalog);
        let settings = Arc::new(FakeSettings::new(
            list_settings(ListType::Trending, quota),
            backend,
        ));
        let factory = Arc::new(FakeFactory::new());
        let history = Arc::new(MemoryHistory::default());
        let provider = Arc::new(CountingProvider::new("discord"));
        let executor = RequestExecutor::new(Arc::new(FakeEnricher::working()), history.clone())
            .with_dispatcher(NotificationDispatcher::default().with_provider(provider.clone()));
        let pipeline =
            ListPipeline::new(catalog.clone(), settings.clone(), factory.clone(), executor);
        Fixture {
            catalog,
            settings,
            factory,
            history,
            provider,
            pipeline,
        }
    }

    fn key() -> JobKey {
        JobKey::new(MediaKind::Movie, ListType::Trending)
    }

    fn items(ids: &[u64]) -> Vec<CandidateItem> {
        ids.iter()
            .map(|id| candidate(&format!("Movie {}", id), *id))
            .collect()
    }

    async fn completed(fixture: &Fixture) -> RunReport {
        match fixture.pipeline.run(key(), &AtomicBool::new(false)).await.unwrap() {
            PipelineRun::Completed(report) => report,
            other => panic!("expected completed run, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_broker_run_with_existing_item() {
        let mut catalog_items = items(&[1]);
        let mut rerelease = candidate("Movie 1 (Remastered)", 1);
        rerelease.ids.imdb = Some("tt9999999".to_string());
        catalog_items.push(rerelease);
        let fixture = fixture(FakeCatalog::new(catalog_items), 5, broker_config());

        let report = completed(&fixture).await;
        assert_eq!(report.fetched, 2);
        assert_eq!(report.selected, 2);
        assert_eq!(report.requested, 1);
        assert_eq!(report.already_exists, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(fixture.history.records().len(), 1);
        assert_eq!(fixture.provider.sent(), 1);
        assert_eq!(fixture.settings.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_item_does_not_abort_batch() {
        let fixture = fixture(FakeCatalog::new(items(&[1, 2, 3])), 5, broker_config());
        fixture.factory.broker.fail_on(2);

        let report = completed(&fixture).await;
        assert_eq!(report.requested, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(
            fixture.factory.broker.requested_titles(),
            vec!["Movie 1", "Movie 2", "Movie 3"]
        );
    }

    #[tokio::test]
    async fn test_quota_limits_requests_in_catalog_order() {
        let fixture = fixture(FakeCatalog::new(items(&[5, 4, 3, 2, 1])), 2, broker_config());

        let report = completed(&fixture).await;
        assert_eq!(report.fetched, 5);
        assert_eq!(report.selected, 2);
        assert_eq!(
            fixture.factory.broker.requested_titles(),
            vec!["Movie 5", "Movie 4"]
        );
    }

    #[tokio::test]
    async fn test_missing_catalog_credentials_skip_run() {
        let fixture = fixture(
            FakeCatalog::new(items(&[1])).without_credentials(),
            5,
            broker_config(),
        );
        let run = fixture.pipeline.run(key(), &AtomicBool::new(false)).await.unwrap();
        assert!(matches!(run, PipelineRun::Skipped(_)));
        assert_eq!(fixture.catalog.fetches(), 0);
        assert!(fixture.factory.broker.requested_titles().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_catalog_error() {
        let fixture = fixture(
            FakeCatalog::new(items(&[1])).unreachable(),
            5,
            broker_config(),
        );
        let result = fixture.pipeline.run(key(), &AtomicBool::new(false)).await;
        assert!(matches!(result, Err(PipelineError::Catalog(_))));
        assert_eq!(fixture.catalog.fetches(), 0);
    }

    #[tokio::test]
    async fn test_zero_quota_skips_fetch() {
        let fixture = fixture(FakeCatalog::new(items(&[1])), 0, broker_config());
        let run = fixture.pipeline.run(key(), &AtomicBool::new(false)).await.unwrap();
        assert!(matches!(run, PipelineRun::Skipped(_)));
        assert_eq!(fixture.catalog.fetches(), 0);
    }

    #[tokio::test]
    async fn test_unknown_quality_profile_aborts_before_requests() {
        let mut config = manager_config();
        if let AcquisitionBackendConfig::DirectManager(manager) = &mut config {
            manager.quality_profile_id = 42;
        }
        let fixture = fixture(FakeCatalog::new(items(&[1, 2])), 5, config);

        let result = fixture.pipeline.run(key(), &AtomicBool::new(false)).await;
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
        assert!(fixture.factory.manager.requests().is_empty());
    }

    #[tokio::test]
    async fn test_manager_run() {
        let fixture = fixture(FakeCatalog::new(items(&[10, 11])), 5, manager_config());

        let report = completed(&fixture).await;
        assert_eq!(report.requested, 2);
        let requests = fixture.factory.manager.requests();
        assert_eq!(requests[0].external_id, 10);
        assert_eq!(requests[0].quality_profile_id, 4);
        assert_eq!(requests[0].root_folder_path, "/movies");
    }

    #[tokio::test]
    async fn test_nothing_selected_skips_backend() {
        let fixture = fixture(FakeCatalog::new(Vec::new()), 5, manager_config());
        fixture.settings.clear_backend();

        let report = completed(&fixture).await;
        assert_eq!(report.selected, 0);
        assert_eq!(fixture.factory.manager.lookups(), 0);
    }

    #[tokio::test]
    async fn test_missing_backend_is_configuration_error() {
        let fixture = fixture(FakeCatalog::new(items(&[1])), 5, broker_config());
        fixture.settings.clear_backend();

        let result = fixture.pipeline.run(key(), &AtomicBool::new(false)).await;
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_stop_flag_leaves_remaining_items() {
        let fixture = fixture(FakeCatalog::new(items(&[1, 2, 3])), 5, broker_config());

        let run = fixture.pipeline.run(key(), &AtomicBool::new(true)).await.unwrap();
        match run {
            PipelineRun::Completed(report) => {
                assert_eq!(report.selected, 3);
                assert_eq!(report.skipped, 3);
                assert_eq!(report.requested, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(fixture.factory.broker.requested_titles().is_empty());
    }

    #[tokio::test]
    async fn test_settings_are_read_every_run() {
        let fixture = fixture(FakeCatalog::new(items(&[1, 2, 3])), 1, broker_config());
        assert_eq!(completed(&fixture).await.selected, 1);

        let mut settings = list_settings(ListType::Trending, 3);
        settings.rules.blacklisted_genres = vec!["Drama".to_string()];
        settings.rules.allowed_languages = vec!["EN".to_string()];
        fixture.settings.update(settings);

        let report = completed(&fixture).await;
        assert_eq!(report.fetched, 3);
        assert_eq!(report.selected, 0);
        assert_eq!(
            fixture.catalog.last_query().unwrap().languages.as_deref(),
            Some("en")
        );
        assert_eq!(fixture.settings.reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_job_runner_maps_errors_to_failed() {
        let fixture = fixture(FakeCatalog::new(items(&[1])), 5, broker_config());
        fixture.settings.clear_backend();

        let disposition = fixture
            .pipeline
            .run_job(key(), Arc::new(AtomicBool::new(false)))
            .await;
        assert!(matches!(disposition, RunDisposition::Failed { .. }));
    }
}
