use serde::{Deserialize, Serialize};
use std::fmt;

use crate::MediaKind;

/// Persisted switch selecting the acquisition backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionMode {
    /// Request broker (Ombi)
    Broker,
    /// Direct library manager (Radarr for movies, Sonarr for shows)
    #[default]
    Manager,
}

impl fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionMode::Broker => f.write_str("broker"),
            AcquisitionMode::Manager => f.write_str("manager"),
        }
    }
}

/// Broker settings resolved for one media kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBrokerConfig {
    pub base_url: String,
    pub api_key: String,
    pub user_id: Option<String>,
    pub language: Option<String>,
    pub root_folder_override: Option<u32>,
    pub quality_override: Option<u32>,
}

/// Manager settings for one media kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectManagerConfig {
    pub base_url: String,
    pub api_key: String,
    pub quality_profile_id: u32,
    pub root_folder_path: String,
    pub minimum_availability: String,
}

/// The single active backend for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionBackendConfig {
    RequestBroker(RequestBrokerConfig),
    DirectManager(DirectManagerConfig),
}

impl AcquisitionBackendConfig {
    pub fn mode(&self) -> AcquisitionMode {
        match self {
            AcquisitionBackendConfig::RequestBroker(_) => AcquisitionMode::Broker,
            AcquisitionBackendConfig::DirectManager(_) => AcquisitionMode::Manager,
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            AcquisitionBackendConfig::RequestBroker(c) => &c.base_url,
            AcquisitionBackendConfig::DirectManager(c) => &c.base_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityProfile {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootFolder {
    #[serde(default)]
    pub id: Option<u32>,
    pub path: String,
}

/// Generic request shape understood by the broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerRequest {
    pub kind: MediaKind,
    pub title: String,
    pub tmdb_id: u64,
    pub language_code: String,
    pub user_id: Option<String>,
    pub root_folder_override: Option<u32>,
    pub quality_override: Option<u32>,
}

/// Add request for a manager, with profile and folder already resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerRequest {
    pub kind: MediaKind,
    pub title: String,
    pub year: Option<u32>,
    /// TMDb id for movies, TVDB id for shows
    pub external_id: u64,
    pub quality_profile_id: u32,
    pub root_folder_path: String,
    pub minimum_availability: String,
}

/// Backend verdict on a submitted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Created,
    AlreadyExists,
}

/// Per-candidate result of a request attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Requested,
    AlreadyExists,
    Failed(String),
}

impl Outcome {
    pub fn is_requested(&self) -> bool {
        matches!(self, Outcome::Requested)
    }
}
