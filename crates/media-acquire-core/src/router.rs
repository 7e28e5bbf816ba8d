use media_acquire_models::{
    AcquisitionBackendConfig, AcquisitionMode, BrokerRequest, CandidateItem, ManagerRequest,
    MediaKind, RequestBrokerConfig, SubmitStatus,
};
use media_acquire_sources::{BackendFactory, DirectManager, RequestBroker, SourceError};
use std::sync::Arc;
use tracing::debug;

use crate::PipelineError;

const DEFAULT_LANGUAGE: &str = "en";

/// Backend chosen for one run, with manager profile and folder already resolved
pub enum PreparedBackend {
    Broker {
        client: Arc<dyn RequestBroker>,
        kind: MediaKind,
        config: RequestBrokerConfig,
    },
    Manager {
        client: Arc<dyn DirectManager>,
        kind: MediaKind,
        quality_profile_id: u32,
        root_folder_path: String,
        minimum_availability: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendRequest {
    Broker(BrokerRequest),
    Manager(ManagerRequest),
}

fn same_folder(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

/// Select the backend for a run and resolve everything it needs up front.
///
/// Manager mode checks the configured quality profile and root folder against
/// the live backend once; a mismatch fails the whole run.
pub async fn route(
    kind: MediaKind,
    config: &AcquisitionBackendConfig,
    factory: &dyn BackendFactory,
) -> Result<PreparedBackend, PipelineError> {
    match config {
        AcquisitionBackendConfig::RequestBroker(broker) => {
            let client = factory
                .broker(broker)
                .map_err(|e| PipelineError::Configuration(e.to_string()))?;
            Ok(PreparedBackend::Broker {
                client,
                kind,
                config: broker.clone(),
            })
        }
        AcquisitionBackendConfig::DirectManager(manager) => {
            let client = factory
                .manager(kind, manager)
                .map_err(|e| PipelineError::Configuration(e.to_string()))?;

            let lookup_failed = |what: &str, e: SourceError| {
                PipelineError::Configuration(format!(
                    "Failed to load {} from {}: {}",
                    what, manager.base_url, e
                ))
            };
            let profiles = client
                .quality_profiles()
                .await
                .map_err(|e| lookup_failed("quality profiles", e))?;
            let profile = profiles
                .iter()
                .find(|p| p.id == manager.quality_profile_id)
                .ok_or_else(|| {
                    PipelineError::Configuration(format!(
                        "Quality profile {} does not exist on {} (available: {})",
                        manager.quality_profile_id,
                        manager.base_url,
                        profiles
                            .iter()
                            .map(|p| format!("{}={}", p.id, p.name))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                })?;

            let folders = client
                .root_folders()
                .await
                .map_err(|e| lookup_failed("root folders", e))?;
            let folder = folders
                .iter()
                .find(|f| same_folder(&f.path, &manager.root_folder_path))
                .ok_or_else(|| {
                    PipelineError::Configuration(format!(
                        "Root folder '{}' does not exist on {}",
                        manager.root_folder_path, manager.base_url
                    ))
                })?;

            debug!(
                quality_profile = %profile.name,
                root_folder = %folder.path,
                "Resolved manager settings"
            );
            Ok(PreparedBackend::Manager {
                client,
                kind,
                quality_profile_id: profile.id,
                root_folder_path: folder.path.clone(),
                minimum_availability: manager.minimum_availability.clone(),
            })
        }
    }
}

impl PreparedBackend {
    pub fn kind(&self) -> MediaKind {
        match self {
            PreparedBackend::Broker { kind, .. } | PreparedBackend::Manager { kind, .. } => *kind,
        }
    }

    pub fn mode(&self) -> AcquisitionMode {
        match self {
            PreparedBackend::Broker { .. } => AcquisitionMode::Broker,
            PreparedBackend::Manager { .. } => AcquisitionMode::Manager,
        }
    }

    /// Map a candidate to this backend's request shape; `Err` names the missing id
    pub fn to_request(&self, item: &CandidateItem) -> Result<BackendRequest, String> {
        match self {
            PreparedBackend::Broker { kind, config, .. } => {
                let tmdb_id = item.ids.tmdb.ok_or_else(|| "missing tmdb id".to_string())?;
                let language_code = item
                    .language_code
                    .clone()
                    .or_else(|| config.language.clone())
                    .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
                Ok(BackendRequest::Broker(BrokerRequest {
                    kind: *kind,
                    title: item.title.clone(),
                    tmdb_id,
                    language_code,
                    user_id: config.user_id.clone(),
                    root_folder_override: config.root_folder_override,
                    quality_override: config.quality_override,
                }))
            }
            PreparedBackend::Manager {
                kind,
                quality_profile_id,
                root_folder_path,
                minimum_availability,
                ..
            } => {
                let external_id = match kind {
                    MediaKind::Movie => item.ids.tmdb.ok_or_else(|| "missing tmdb id".to_string())?,
                    MediaKind::Show => item.ids.tvdb.ok_or_else(|| "missing tvdb id".to_string())?,
                };
                Ok(BackendRequest::Manager(ManagerRequest {
                    kind: *kind,
                    title: item.title.clone(),
                    year: item.year,
                    external_id,
                    quality_profile_id: *quality_profile_id,
                    root_folder_path: root_folder_path.clone(),
                    minimum_availability: minimum_availability.clone(),
                }))
            }
        }
    }

    /// Exactly one backend call
    pub async fn submit(&self, request: &BackendRequest) -> Result<SubmitStatus, SourceError> {
        match (self, request) {
            (PreparedBackend::Broker { client, .. }, BackendRequest::Broker(request)) => {
                client.request(request).await
            }
            (PreparedBackend::Manager { client, .. }, BackendRequest::Manager(request)) => {
                client.request(request).await
            }
            _ => Err(SourceError::new("request shape does not match the selected backend")),
        }
    }
}
