//! Process-level wiring shared by the commands.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_acquire_config::{Config, ConfigHandle, PathManager};
use media_acquire_core::{ListPipeline, NotificationDispatcher, RequestExecutor};
use media_acquire_sources::{
    build_client, notification_providers, FileSettingsStore, HttpBackendFactory, JsonHistoryStore,
    OmdbEnricher, TraktCatalog,
};
use std::sync::Arc;
use tracing::debug;

pub struct App {
    pub paths: PathManager,
    pub handle: ConfigHandle,
    pub config: Config,
}

impl App {
    /// Load the configuration; a missing file is an error pointing at `config init`
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let handle = ConfigHandle::new(paths.config_file());
        if !handle.exists() {
            return Err(eyre!(
                "Configuration file not found at {}. Run 'marquee config init' to create one.",
                handle.path().display()
            ));
        }
        let config = handle.load().map_err(|e| eyre!("{:#}", e))?;
        Ok(Self {
            paths,
            handle,
            config,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.config
            .validate()
            .map_err(|e| {
                eyre!(
                    "Invalid configuration in {}: {:#}",
                    self.handle.path().display(),
                    e
                )
            })
    }

    pub fn history_store(&self) -> JsonHistoryStore {
        JsonHistoryStore::new(self.config.history_file(self.paths.data_dir()))
    }

    /// Build the pipeline with live collaborators.
    ///
    /// Settings, catalog credentials and backend endpoints are re-read from the
    /// config file on every run; notification providers are fixed here.
    pub fn pipeline(&self) -> ListPipeline {
        let client = build_client();
        let providers = notification_providers(&self.config, &client);
        debug!(providers = providers.len(), "Notification providers configured");

        let executor = RequestExecutor::new(
            Arc::new(OmdbEnricher::new(client.clone(), self.handle.clone())),
            Arc::new(self.history_store()),
        )
        .with_dispatcher(NotificationDispatcher::new(providers));

        ListPipeline::new(
            Arc::new(TraktCatalog::new(client.clone(), self.handle.clone())),
            Arc::new(FileSettingsStore::new(self.handle.clone())),
            Arc::new(HttpBackendFactory::new(client)),
            executor,
        )
    }
}
