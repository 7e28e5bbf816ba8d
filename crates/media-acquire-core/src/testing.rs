//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use media_acquire_models::{
    AcquiredMediaRecord, AcquisitionBackendConfig, BrokerRequest, CandidateItem, CatalogQuery,
    DirectManagerConfig, Enrichment, ExternalIds, ListSettings, ListType, ManagerRequest,
    MediaKind, NotificationEvent, NotificationKind, QualityProfile, RequestBrokerConfig,
    RootFolder, SubmitStatus,
};
use media_acquire_sources::{
    AppendStatus, BackendFactory, CandidateSource, DirectManager, HistoryStore, MetadataEnricher,
    NotificationProvider, RequestBroker, RunSettings, SettingsStore, SourceError,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) fn candidate(title: &str, id: u64) -> CandidateItem {
    CandidateItem {
        title: title.to_string(),
        year: Some(2024),
        runtime_minutes: Some(110),
        genres: vec!["drama".to_string()],
        country_code: Some("us".to_string()),
        language_code: Some("en".to_string()),
        network: None,
        overview: Some(format!("{} overview", title)),
        rating: Some(7.5),
        ids: ExternalIds {
            trakt: Some(id),
            slug: None,
            imdb: Some(format!("tt{:07}", id)),
            tmdb: Some(id),
            tvdb: Some(id + 1_000_000),
        },
    }
}

pub(crate) fn event(title: &str) -> NotificationEvent {
    NotificationEvent {
        kind: NotificationKind::MovieAdded,
        title: title.to_string(),
        year: Some(2024),
        overview: String::new(),
        genres: Vec::new(),
        rating: None,
        imdb_id: None,
        poster_url: String::new(),
    }
}

pub(crate) fn broker_config() -> AcquisitionBackendConfig {
    AcquisitionBackendConfig::RequestBroker(RequestBrokerConfig {
        base_url: "http://ombi:5000".to_string(),
        api_key: "key".to_string(),
        user_id: Some("user-1".to_string()),
        language: Some("de".to_string()),
        root_folder_override: Some(2),
        quality_override: None,
    })
}

pub(crate) fn manager_config() -> AcquisitionBackendConfig {
    AcquisitionBackendConfig::DirectManager(DirectManagerConfig {
        base_url: "http://radarr:7878".to_string(),
        api_key: "key".to_string(),
        quality_profile_id: 4,
        root_folder_path: "/movies".to_string(),
        minimum_availability: "released".to_string(),
    })
}

pub(crate) fn list_settings(list: ListType, quota: u32) -> ListSettings {
    let mut settings = ListSettings::default();
    settings.quotas.set(list, quota);
    settings.schedules.set(list, "0 3 * * *".to_string());
    settings
}

fn unavailable(id: u64) -> SourceError {
    SourceError::Status {
        service: "fake".to_string(),
        status: 503,
        body: format!("unavailable for {}", id),
    }
}

/// Remembers requested ids; the second request for an id reports AlreadyExists
#[derive(Default)]
pub(crate) struct RecordingBroker {
    requests: Mutex<Vec<BrokerRequest>>,
    existing: Mutex<HashSet<u64>>,
    failing: Mutex<HashSet<u64>>,
}

impl RecordingBroker {
    pub(crate) fn fail_on(&self, id: u64) {
        self.failing.lock().unwrap().insert(id);
    }

    pub(crate) fn requested_titles(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|r| r.title.clone()).collect()
    }
}

#[async_trait]
impl RequestBroker for RecordingBroker {
    async fn request(&self, request: &BrokerRequest) -> Result<SubmitStatus, SourceError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.failing.lock().unwrap().contains(&request.tmdb_id) {
            return Err(unavailable(request.tmdb_id));
        }
        if self.existing.lock().unwrap().insert(request.tmdb_id) {
            Ok(SubmitStatus::Created)
        } else {
            Ok(SubmitStatus::AlreadyExists)
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingManager {
    requests: Mutex<Vec<ManagerRequest>>,
    existing: Mutex<HashSet<u64>>,
    lookups: AtomicUsize,
}

impl RecordingManager {
    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<ManagerRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectManager for RecordingManager {
    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, SourceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            QualityProfile {
                id: 1,
                name: "Any".to_string(),
            },
            QualityProfile {
                id: 4,
                name: "HD-1080p".to_string(),
            },
        ])
    }

    async fn root_folders(&self) -> Result<Vec<RootFolder>, SourceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            RootFolder {
                id: Some(1),
                path: "/movies".to_string(),
            },
            RootFolder {
                id: Some(2),
                path: "/tv".to_string(),
            },
        ])
    }

    async fn request(&self, request: &ManagerRequest) -> Result<SubmitStatus, SourceError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.existing.lock().unwrap().insert(request.external_id) {
            Ok(SubmitStatus::Created)
        } else {
            Ok(SubmitStatus::AlreadyExists)
        }
    }
}

pub(crate) struct FakeFactory {
    pub(crate) broker: Arc<RecordingBroker>,
    pub(crate) manager: Arc<RecordingManager>,
}

impl FakeFactory {
    pub(crate) fn new() -> Self {
        Self {
            broker: Arc::new(RecordingBroker::default()),
            manager: Arc::new(RecordingManager::default()),
        }
    }
}

impl BackendFactory for FakeFactory {
    fn broker(&self, _config: &RequestBrokerConfig) -> Result<Arc<dyn RequestBroker>, SourceError> {
        let broker: Arc<dyn RequestBroker> = self.broker.clone();
        Ok(broker)
    }

    fn manager(
        &self,
        _kind: MediaKind,
        _config: &DirectManagerConfig,
    ) -> Result<Arc<dyn DirectManager>, SourceError> {
        let manager: Arc<dyn DirectManager> = self.manager.clone();
        Ok(manager)
    }
}

pub(crate) struct FakeCatalog {
    items: Mutex<Vec<CandidateItem>>,
    available: AtomicBool,
    reachable: AtomicBool,
    fetches: AtomicUsize,
    queries: Mutex<Vec<CatalogQuery>>,
}

impl FakeCatalog {
    pub(crate) fn new(items: Vec<CandidateItem>) -> Self {
        Self {
            items: Mutex::new(items),
            available: AtomicBool::new(true),
            reachable: AtomicBool::new(true),
            fetches: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn without_credentials(self) -> Self {
        self.available.store(false, Ordering::SeqCst);
        self
    }

    pub(crate) fn unreachable(self) -> Self {
        self.reachable.store(false, Ordering::SeqCst);
        self
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn last_query(&self) -> Option<CatalogQuery> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CandidateSource for FakeCatalog {
    async fn ping(&self) -> Result<(), SourceError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(SourceError::NotConfigured("Trakt client id".to_string()));
        }
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(SourceError::new("connection refused"));
        }
        Ok(())
    }

    async fn fetch(
        &self,
        _kind: MediaKind,
        _list: ListType,
        query: &CatalogQuery,
    ) -> Result<Vec<CandidateItem>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.items.lock().unwrap().clone())
    }
}

pub(crate) struct FakeSettings {
    settings: Mutex<ListSettings>,
    backend: Mutex<Option<AcquisitionBackendConfig>>,
    pub(crate) reads: AtomicUsize,
}

impl FakeSettings {
    pub(crate) fn new(settings: ListSettings, backend: AcquisitionBackendConfig) -> Self {
        Self {
            settings: Mutex::new(settings),
            backend: Mutex::new(Some(backend)),
            reads: AtomicUsize::new(0),
        }
    }

    pub(crate) fn update(&self, settings: ListSettings) {
        *self.settings.lock().unwrap() = settings;
    }

    pub(crate) fn clear_backend(&self) {
        *self.backend.lock().unwrap() = None;
    }
}

#[async_trait]
impl SettingsStore for FakeSettings {
    async fn snapshot(&self, _kind: MediaKind) -> Result<RunSettings, SourceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(RunSettings {
            list: self.settings.lock().unwrap().clone(),
            fetch_limit: 1000,
            backend: self
                .backend
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| "Radarr is not configured".to_string()),
        })
    }
}

pub(crate) struct FakeEnricher {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeEnricher {
    pub(crate) fn working() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataEnricher for FakeEnricher {
    async fn fetch(&self, imdb_id: &str) -> Result<Enrichment, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::new("metadata service down"));
        }
        Ok(Enrichment {
            title: format!("Enriched {}", imdb_id),
            poster: format!("https://img/{}.jpg", imdb_id),
            summary: format!("Plot of {}", imdb_id),
        })
    }
}

#[derive(Default)]
pub(crate) struct MemoryHistory {
    records: Mutex<Vec<AcquiredMediaRecord>>,
    fail: bool,
}

impl MemoryHistory {
    pub(crate) fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn records(&self) -> Vec<AcquiredMediaRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn append(&self, record: &AcquiredMediaRecord) -> Result<AppendStatus, SourceError> {
        if self.fail {
            return Err(SourceError::new("disk full"));
        }
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.same_item(record)) {
            return Ok(AppendStatus::Duplicate);
        }
        records.push(record.clone());
        Ok(AppendStatus::Inserted)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AcquiredMediaRecord>, SourceError> {
        Ok(self.records.lock().unwrap().iter().rev().take(limit).cloned().collect())
    }
}

pub(crate) struct CountingProvider {
    name: String,
    fail: bool,
    sent: AtomicUsize,
    events: Mutex<Vec<NotificationEvent>>,
}

impl CountingProvider {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail: false,
            sent: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    pub(crate) fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    pub(crate) fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationProvider for CountingProvider {
    fn provider_name(&self) -> &str {
        &self.name
    }

    async fn send(&self, event: &NotificationEvent) -> Result<(), SourceError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(event.clone());
        if self.fail {
            return Err(SourceError::new("webhook rejected"));
        }
        Ok(())
    }
}
