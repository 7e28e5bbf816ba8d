//! Construction of collaborator clients from configuration.

use media_acquire_config::Config;
use media_acquire_models::{DirectManagerConfig, MediaKind, RequestBrokerConfig};
use reqwest::Client;
use std::sync::Arc;

use crate::discord::DiscordNotifier;
use crate::ombi::OmbiBroker;
use crate::servarr::ServarrManager;
use crate::traits::{BackendFactory, DirectManager, NotificationProvider, RequestBroker};
use crate::SourceError;

/// Builds HTTP backend clients sharing one connection pool
#[derive(Clone)]
pub struct HttpBackendFactory {
    client: Client,
}

impl HttpBackendFactory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn require(value: &str, what: &str) -> Result<(), SourceError> {
    if value.trim().is_empty() {
        return Err(SourceError::NotConfigured(what.to_string()));
    }
    Ok(())
}

impl BackendFactory for HttpBackendFactory {
    fn broker(&self, config: &RequestBrokerConfig) -> Result<Arc<dyn RequestBroker>, SourceError> {
        require(&config.base_url, "Ombi URL")?;
        require(&config.api_key, "Ombi API key")?;
        Ok(Arc::new(OmbiBroker::new(self.client.clone(), config.clone())))
    }

    fn manager(
        &self,
        kind: MediaKind,
        config: &DirectManagerConfig,
    ) -> Result<Arc<dyn DirectManager>, SourceError> {
        let service = ServarrManager::service_name(kind);
        require(&config.base_url, &format!("{} URL", service))?;
        require(&config.api_key, &format!("{} API key", service))?;
        Ok(Arc::new(ServarrManager::new(self.client.clone(), kind, config.clone())))
    }
}

/// Notification providers enabled in the configuration
pub fn notification_providers(
    config: &Config,
    client: &Client,
) -> Vec<Arc<dyn NotificationProvider>> {
    let mut providers: Vec<Arc<dyn NotificationProvider>> = Vec::new();

    if let Some(discord) = &config.notifications.discord {
        if discord.enabled && !discord.webhook_url.trim().is_empty() {
            providers.push(Arc::new(DiscordNotifier::new(
                client.clone(),
                discord.webhook_url.clone(),
                discord.username.clone(),
            )));
        }
    }

    providers
}
