use async_trait::async_trait;
use media_acquire_config::{Config, ConfigHandle};
use media_acquire_models::MediaKind;

use crate::traits::{RunSettings, SettingsStore};
use crate::SourceError;

/// Settings read straight from the config file on every call
#[derive(Clone)]
pub struct FileSettingsStore {
    config: ConfigHandle,
}

impl FileSettingsStore {
    pub fn new(config: ConfigHandle) -> Self {
        Self { config }
    }

    fn load(&self) -> Result<Config, SourceError> {
        self.config
            .load()
            .map_err(|e| SourceError::Config(format!("{:#}", e)))
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn snapshot(&self, kind: MediaKind) -> Result<RunSettings, SourceError> {
        let config = self.load()?;
        Ok(RunSettings {
            list: config.list_settings(kind).clone(),
            fetch_limit: config.catalog.fetch_limit,
            backend: config.backend_config(kind).map_err(|e| format!("{:#}", e)),
        })
    }
}
