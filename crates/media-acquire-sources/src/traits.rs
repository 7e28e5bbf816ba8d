use async_trait::async_trait;
use media_acquire_models::{
    AcquiredMediaRecord, AcquisitionBackendConfig, BrokerRequest, CandidateItem, CatalogQuery,
    DirectManagerConfig, Enrichment, ListSettings, ListType, ManagerRequest, MediaKind,
    NotificationEvent, QualityProfile, RequestBrokerConfig, RootFolder, SubmitStatus,
};
use std::sync::Arc;

use crate::SourceError;

/// Catalog of trending/popular/anticipated/box-office lists
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Fails when the catalog cannot be used at all (no credentials)
    async fn ping(&self) -> Result<(), SourceError>;

    /// Ordered candidates for one list; order is the catalog's ranking
    async fn fetch(
        &self,
        kind: MediaKind,
        list: ListType,
        query: &CatalogQuery,
    ) -> Result<Vec<CandidateItem>, SourceError>;
}

/// Broker-style intermediary that forwards requests to the real managers
#[async_trait]
pub trait RequestBroker: Send + Sync {
    async fn request(&self, request: &BrokerRequest) -> Result<SubmitStatus, SourceError>;
}

/// Library manager that monitors and downloads directly
#[async_trait]
pub trait DirectManager: Send + Sync {
    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, SourceError>;
    async fn root_folders(&self) -> Result<Vec<RootFolder>, SourceError>;
    async fn request(&self, request: &ManagerRequest) -> Result<SubmitStatus, SourceError>;
}

#[async_trait]
pub trait MetadataEnricher: Send + Sync {
    async fn fetch(&self, imdb_id: &str) -> Result<Enrichment, SourceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendStatus {
    Inserted,
    /// Same item already recorded; nothing written
    Duplicate,
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, record: &AcquiredMediaRecord) -> Result<AppendStatus, SourceError>;

    /// Newest first
    async fn recent(&self, limit: usize) -> Result<Vec<AcquiredMediaRecord>, SourceError>;
}

#[async_trait]
pub trait NotificationProvider: Send + Sync {
    fn provider_name(&self) -> &str;
    async fn send(&self, event: &NotificationEvent) -> Result<(), SourceError>;
}

/// Everything one run depends on, taken from a single read of the settings
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub list: ListSettings,
    pub fetch_limit: u32,
    /// `Err` carries why no backend is usable for this kind
    pub backend: Result<AcquisitionBackendConfig, String>,
}

/// Persisted user settings, read fresh on every call
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn snapshot(&self, kind: MediaKind) -> Result<RunSettings, SourceError>;
}

/// Builds backend clients for the configuration read at the start of a run
pub trait BackendFactory: Send + Sync {
    fn broker(&self, config: &RequestBrokerConfig) -> Result<Arc<dyn RequestBroker>, SourceError>;
    fn manager(
        &self,
        kind: MediaKind,
        config: &DirectManagerConfig,
    ) -> Result<Arc<dyn DirectManager>, SourceError>;
}
