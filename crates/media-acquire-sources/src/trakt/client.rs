use async_trait::async_trait;
use media_acquire_config::ConfigHandle;
use media_acquire_models::{CandidateItem, CatalogQuery, ListType, MediaKind};
use reqwest::Client;
use tracing::debug;

use crate::http::{ensure_success, join_url};
use crate::trakt::api;
use crate::traits::CandidateSource;
use crate::SourceError;

const SERVICE: &str = "Trakt";

/// Trakt public list endpoints
///
/// Credentials and base URL come from the config file on every call, so a
/// client id added while the daemon runs is picked up on the next tick.
#[derive(Clone)]
pub struct TraktCatalog {
    client: Client,
    config: ConfigHandle,
}

struct Endpoint {
    base_url: String,
    client_id: String,
}

impl TraktCatalog {
    pub fn new(client: Client, config: ConfigHandle) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> Result<Endpoint, SourceError> {
        let config = self
            .config
            .load()
            .map_err(|e| SourceError::Config(format!("{:#}", e)))?;
        let client_id = config
            .catalog_client_id()
            .ok_or_else(|| SourceError::NotConfigured("Trakt client id".to_string()))?
            .to_string();
        Ok(Endpoint {
            base_url: config.catalog.base_url.clone(),
            client_id,
        })
    }

    pub fn list_path(kind: MediaKind, list: ListType) -> Result<String, SourceError> {
        let segment = match kind {
            MediaKind::Movie => "movies",
            MediaKind::Show => "shows",
        };
        if !kind.list_types().contains(&list) {
            return Err(SourceError::new(format!(
                "Trakt has no {} list for {}",
                list.display_name(),
                segment
            )));
        }
        Ok(format!("{}/{}", segment, list.catalog_path()))
    }
}

#[async_trait]
impl CandidateSource for TraktCatalog {
    async fn ping(&self) -> Result<(), SourceError> {
        self.endpoint().map(|_| ())
    }

    async fn fetch(
        &self,
        kind: MediaKind,
        list: ListType,
        query: &CatalogQuery,
    ) -> Result<Vec<CandidateItem>, SourceError> {
        let endpoint = self.endpoint()?;
        let url = join_url(&endpoint.base_url, &Self::list_path(kind, list)?);
        debug!(url = %url, params = ?query.to_pairs(), "Fetching Trakt list");

        let response = self
            .client
            .get(&url)
            .header("trakt-api-version", "2")
            .header("trakt-api-key", &endpoint.client_id)
            .header("Content-Type", "application/json")
            .query(&query.to_pairs())
            .send()
            .await?;
        let response = ensure_success(SERVICE, response).await?;
        let body = response.text().await?;
        Ok(api::parse_list(&body, kind)?)
    }
}
