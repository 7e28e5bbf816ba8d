use media_acquire_models::{
    normalize_cron, AcquisitionBackendConfig, AcquisitionMode, DirectManagerConfig, ListJobSpec,
    ListSettings, ListType, MediaKind, RequestBrokerConfig,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PLACEHOLDER_PREFIX: &str = "YOUR_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
    #[serde(default)]
    pub movies: ListSettings,
    #[serde(default)]
    pub shows: ListSettings,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Trakt catalog access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            base_url: default_catalog_url(),
            fetch_limit: default_fetch_limit(),
        }
    }
}

/// OMDb metadata lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omdb_api_key: Option<String>,
    #[serde(default = "default_omdb_url")]
    pub base_url: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            omdb_api_key: None,
            base_url: default_omdb_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    #[serde(default)]
    pub mode: AcquisitionMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker: Option<BrokerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radarr: Option<ManagerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sonarr: Option<ManagerConfig>,
}

/// Ombi request broker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    pub base_url: String,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_root_folder: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_quality: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_root_folder: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_quality: Option<u32>,
}

/// Radarr or Sonarr
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    pub base_url: String,
    pub api_key: String,
    pub quality_profile_id: u32,
    pub root_folder_path: String,
    #[serde(default = "default_minimum_availability")]
    pub minimum_availability: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<DiscordConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Relative paths resolve against the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            run_on_startup: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_catalog_url() -> String {
    "https://api.trakt.tv".to_string()
}

fn default_fetch_limit() -> u32 {
    1000
}

fn default_omdb_url() -> String {
    "https://www.omdbapi.com".to_string()
}

pub fn default_minimum_availability() -> String {
    "released".to_string()
}

fn is_set(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.starts_with(PLACEHOLDER_PREFIX)
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.catalog.fetch_limit == 0 {
            return Err(anyhow::anyhow!("catalog.fetch_limit must be greater than zero"));
        }

        for kind in MediaKind::ALL {
            let settings = self.list_settings(kind);
            for list in ListType::ALL {
                let supported = kind.list_types().contains(&list);
                if let Some(cron) = settings.schedule(list) {
                    if !supported {
                        return Err(anyhow::anyhow!(
                            "{}s have no {} list; remove its schedule",
                            kind,
                            list
                        ));
                    }
                    if let Err(e) = normalize_cron(cron) {
                        return Err(anyhow::anyhow!(
                            "Invalid cron expression for {}-{}: '{}' ({})",
                            kind,
                            list,
                            cron,
                            e
                        ));
                    }
                }
                if !supported && settings.quota(list) > 0 {
                    return Err(anyhow::anyhow!(
                        "{}s have no {} list; remove its quota",
                        kind,
                        list
                    ));
                }
            }

            if let (Some(min), Some(max)) = (settings.rules.min_year, settings.rules.max_year) {
                if min > max {
                    return Err(anyhow::anyhow!(
                        "{} min_year {} is after max_year {}",
                        kind,
                        min,
                        max
                    ));
                }
            }
            let runtimes = (settings.rules.min_runtime, settings.rules.max_runtime);
            if let (Some(min), Some(max)) = runtimes {
                if min > max {
                    return Err(anyhow::anyhow!(
                        "{} min_runtime {} exceeds max_runtime {}",
                        kind,
                        min,
                        max
                    ));
                }
            }
        }

        match self.acquisition.mode {
            AcquisitionMode::Broker => {
                let broker = self.acquisition.broker.as_ref().ok_or_else(|| {
                    anyhow::anyhow!(
                        "acquisition.mode is 'broker' but [acquisition.broker] is missing"
                    )
                })?;
                if !is_set(&broker.base_url) || !is_set(&broker.api_key) {
                    return Err(anyhow::anyhow!("[acquisition.broker] needs base_url and api_key"));
                }
            }
            AcquisitionMode::Manager => {
                for kind in MediaKind::ALL {
                    if self.job_specs_for(kind).is_empty() {
                        continue;
                    }
                    let (section, manager) = match kind {
                        MediaKind::Movie => ("radarr", self.acquisition.radarr.as_ref()),
                        MediaKind::Show => ("sonarr", self.acquisition.sonarr.as_ref()),
                    };
                    let manager = manager.ok_or_else(|| {
                        anyhow::anyhow!(
                            "{} jobs are scheduled in manager mode but [acquisition.{}] is missing",
                            kind,
                            section
                        )
                    })?;
                    if !is_set(&manager.base_url) || !is_set(&manager.api_key) {
                        return Err(anyhow::anyhow!(
                            "[acquisition.{}] needs base_url and api_key",
                            section
                        ));
                    }
                    if manager.root_folder_path.trim().is_empty() {
                        return Err(anyhow::anyhow!(
                            "[acquisition.{}] needs root_folder_path",
                            section
                        ));
                    }
                }
            }
        }

        if let Some(discord) = &self.notifications.discord {
            if discord.enabled && !is_set(&discord.webhook_url) {
                return Err(anyhow::anyhow!(
                    "Discord notifications are enabled but webhook_url is not configured"
                ));
            }
        }

        Ok(())
    }

    /// Catalog client id, if one has been filled in
    pub fn catalog_client_id(&self) -> Option<&str> {
        self.catalog
            .client_id
            .as_deref()
            .filter(|id| is_set(id))
    }

    pub fn omdb_api_key(&self) -> Option<&str> {
        self.enrichment
            .omdb_api_key
            .as_deref()
            .filter(|key| is_set(key))
    }

    pub fn list_settings(&self, kind: MediaKind) -> &ListSettings {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Show => &self.shows,
        }
    }

    /// Resolve the active backend for one media kind
    pub fn backend_config(&self, kind: MediaKind) -> anyhow::Result<AcquisitionBackendConfig> {
        match self.acquisition.mode {
            AcquisitionMode::Broker => {
                let broker = self
                    .acquisition
                    .broker
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("Request broker is not configured"))?;
                let (root_folder_override, quality_override) = match kind {
                    MediaKind::Movie => (broker.movie_root_folder, broker.movie_quality),
                    MediaKind::Show => (broker.show_root_folder, broker.show_quality),
                };
                Ok(AcquisitionBackendConfig::RequestBroker(RequestBrokerConfig {
                    base_url: broker.base_url.clone(),
                    api_key: broker.api_key.clone(),
                    user_id: broker.user_id.clone().filter(|u| !u.trim().is_empty()),
                    language: broker.language.clone().filter(|l| !l.trim().is_empty()),
                    root_folder_override,
                    quality_override,
                }))
            }
            AcquisitionMode::Manager => {
                let (name, manager) = match kind {
                    MediaKind::Movie => ("Radarr", self.acquisition.radarr.as_ref()),
                    MediaKind::Show => ("Sonarr", self.acquisition.sonarr.as_ref()),
                };
                let manager = manager.ok_or_else(|| anyhow::anyhow!("{} is not configured", name))?;
                let minimum_availability = if manager.minimum_availability.trim().is_empty() {
                    default_minimum_availability()
                } else {
                    manager.minimum_availability.clone()
                };
                Ok(AcquisitionBackendConfig::DirectManager(DirectManagerConfig {
                    base_url: manager.base_url.clone(),
                    api_key: manager.api_key.clone(),
                    quality_profile_id: manager.quality_profile_id,
                    root_folder_path: manager.root_folder_path.clone(),
                    minimum_availability,
                }))
            }
        }
    }

    /// Jobs for one kind that have both a schedule and a non-zero quota
    pub fn job_specs_for(&self, kind: MediaKind) -> Vec<ListJobSpec> {
        let settings = self.list_settings(kind);
        kind.list_types()
            .iter()
            .filter_map(|list| {
                let cron = settings.schedule(*list)?;
                let quota = settings.quota(*list);
                (quota > 0).then(|| ListJobSpec::new(kind, *list, cron, quota))
            })
            .collect()
    }

    pub fn job_specs(&self) -> Vec<ListJobSpec> {
        MediaKind::ALL
            .iter()
            .flat_map(|kind| self.job_specs_for(*kind))
            .collect()
    }

    /// History file path; relative paths resolve under `data_dir`
    pub fn history_file(&self, data_dir: &Path) -> PathBuf {
        match &self.history.file {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => data_dir.join(file),
            None => data_dir.join("history.json"),
        }
    }
}

/// Starter configuration written by `config init`
pub fn default_template() -> &'static str {
    r#"# marquee configuration

[catalog]
# Trakt API application client id (https://trakt.tv/oauth/applications)
client_id = "YOUR_CLIENT_ID"
fetch_limit = 1000

[enrichment]
omdb_api_key = "YOUR_OMDB_API_KEY"

[acquisition]
# "manager" sends items straight to Radarr/Sonarr, "broker" goes through Ombi
mode = "manager"

[acquisition.radarr]
base_url = "http://localhost:7878"
api_key = "YOUR_RADARR_API_KEY"
quality_profile_id = 1
root_folder_path = "/movies"
minimum_availability = "released"

[acquisition.sonarr]
base_url = "http://localhost:8989"
api_key = "YOUR_SONARR_API_KEY"
quality_profile_id = 1
root_folder_path = "/tv"

# [acquisition.broker]
# base_url = "http://localhost:5000"
# api_key = "YOUR_OMBI_API_KEY"
# user_id = ""
# language = "en"

[movies]
allowed_countries = ["us", "gb"]
allowed_languages = ["en"]
blacklisted_genres = ["documentary"]
blacklisted_title_keywords = []
blacklisted_external_ids = []
min_runtime = 60
max_runtime = 200

[movies.quotas]
anticipated = 2
popular = 3
trending = 3
box_office = 2

[movies.schedules]
anticipated = "0 2 * * *"
popular = "0 3 * * *"
trending = "0 */6 * * *"
box_office = "0 4 * * Mon"

[shows]
allowed_languages = ["en"]
blacklisted_genres = ["reality"]
blacklisted_networks = []

[shows.quotas]
popular = 2
trending = 2

[shows.schedules]
popular = "30 3 * * *"
trending = "30 */6 * * *"

# [notifications.discord]
# webhook_url = "https://discord.com/api/webhooks/..."

[scheduler]
run_on_startup = true
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn manager(root: &str) -> ManagerConfig {
        ManagerConfig {
            base_url: "http://localhost:7878".to_string(),
            api_key: "abc123".to_string(),
            quality_profile_id: 4,
            root_folder_path: root.to_string(),
            minimum_availability: default_minimum_availability(),
        }
    }

    fn scheduled_config() -> Config {
        let mut config = Config::default();
        config.movies.quotas.set(ListType::Popular, 3);
        config.movies.schedules.set(ListType::Popular, "0 3 * * *".to_string());
        config.acquisition.radarr = Some(manager("/movies"));
        config
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = scheduled_config();
        config.catalog.client_id = Some("client".to_string());
        config.movies.rules.blacklisted_genres = vec!["Horror".to_string()];

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.catalog_client_id(), Some("client"));
        assert_eq!(loaded.movies.quota(ListType::Popular), 3);
        assert_eq!(loaded.movies.rules.blacklisted_genres, vec!["Horror".to_string()]);
        assert_eq!(loaded.acquisition.radarr.unwrap().root_folder_path, "/movies");
    }

    #[test]
    fn test_default_template_parses() {
        let config: Config = toml::from_str(default_template()).unwrap();
        assert_eq!(config.acquisition.mode, AcquisitionMode::Manager);
        assert_eq!(config.catalog_client_id(), None);
        assert_eq!(config.job_specs().len(), 6);
        assert_eq!(config.movies.rules.min_runtime, Some(60));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.catalog.base_url, "https://api.trakt.tv");
        assert_eq!(config.catalog.fetch_limit, 1000);
        assert!(config.scheduler.run_on_startup);
        assert!(config.job_specs().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_job_specs_require_schedule_and_quota() {
        let mut config = scheduled_config();
        config.movies.quotas.set(ListType::Trending, 5);
        config.movies.schedules.set(ListType::Anticipated, "0 1 * * *".to_string());

        let specs = config.job_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].key().to_string(), "movie-popular");
        assert_eq!(specs[0].quota, 3);
    }

    #[test]
    fn test_validate_rejects_bad_cron() {
        let mut config = scheduled_config();
        config.movies.schedules.set(ListType::Popular, "every day".to_string());
        assert!(config.validate().is_err());

        config.movies.schedules.set(ListType::Popular, "0 0 3 * * *".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_matches_scheduler_cron_rules() {
        let mut config = scheduled_config();
        config.movies.schedules.set(ListType::Popular, "0 12 * * 0".to_string());
        assert!(config.validate().is_ok());

        config.movies.schedules.set(ListType::Popular, "0 12 * * 8".to_string());
        assert!(config.validate().is_err());

        config.movies.schedules.set(ListType::Popular, "0 0 3 * * * 2026".to_string());
        assert!(config.validate().is_err());

        config.movies.schedules.set(ListType::Popular, "0 25 * * *".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_show_box_office() {
        let mut config = Config::default();
        config.shows.quotas.set(ListType::BoxOffice, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_manager_section_required() {
        let mut config = scheduled_config();
        config.acquisition.radarr = None;
        assert!(config.validate().is_err());

        config.acquisition.radarr = Some(manager("/movies"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_broker_mode() {
        let mut config = scheduled_config();
        config.acquisition.mode = AcquisitionMode::Broker;
        assert!(config.validate().is_err());

        config.acquisition.broker = Some(BrokerConfig {
            base_url: "http://ombi:5000".to_string(),
            api_key: "YOUR_OMBI_API_KEY".to_string(),
            user_id: None,
            language: None,
            movie_root_folder: None,
            movie_quality: None,
            show_root_folder: None,
            show_quality: None,
        });
        assert!(config.validate().is_err());

        if let Some(broker) = config.acquisition.broker.as_mut() {
            broker.api_key = "real".to_string();
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_discord_needs_webhook() {
        let mut config = Config::default();
        config.notifications.discord = Some(DiscordConfig {
            enabled: true,
            webhook_url: String::new(),
            username: None,
        });
        assert!(config.validate().is_err());

        if let Some(discord) = config.notifications.discord.as_mut() {
            discord.enabled = false;
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_config_follows_mode() {
        let mut config = scheduled_config();
        match config.backend_config(MediaKind::Movie).unwrap() {
            AcquisitionBackendConfig::DirectManager(manager) => {
                assert_eq!(manager.quality_profile_id, 4);
                assert_eq!(manager.minimum_availability, "released");
            }
            other => panic!("expected manager, got {:?}", other),
        }
        assert!(config.backend_config(MediaKind::Show).is_err());

        config.acquisition.mode = AcquisitionMode::Broker;
        config.acquisition.broker = Some(BrokerConfig {
            base_url: "http://ombi:5000".to_string(),
            api_key: "key".to_string(),
            user_id: Some(String::new()),
            language: Some("de".to_string()),
            movie_root_folder: Some(2),
            movie_quality: Some(7),
            show_root_folder: Some(3),
            show_quality: None,
        });
        match config.backend_config(MediaKind::Show).unwrap() {
            AcquisitionBackendConfig::RequestBroker(broker) => {
                assert_eq!(broker.user_id, None);
                assert_eq!(broker.language.as_deref(), Some("de"));
                assert_eq!(broker.root_folder_override, Some(3));
                assert_eq!(broker.quality_override, None);
            }
            other => panic!("expected broker, got {:?}", other),
        }
    }

    #[test]
    fn test_history_file_resolution() {
        let mut config = Config::default();
        let data = Path::new("/srv/marquee/data");
        assert_eq!(config.history_file(data), data.join("history.json"));

        config.history.file = Some(PathBuf::from("acquired.json"));
        assert_eq!(config.history_file(data), data.join("acquired.json"));

        config.history.file = Some(PathBuf::from("/tmp/h.json"));
        assert_eq!(config.history_file(data), PathBuf::from("/tmp/h.json"));
    }
}
