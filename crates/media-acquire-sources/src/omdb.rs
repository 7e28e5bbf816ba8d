use async_trait::async_trait;
use media_acquire_config::ConfigHandle;
use media_acquire_models::Enrichment;
use reqwest::Client;
use serde::Deserialize;

use crate::http::ensure_success;
use crate::traits::MetadataEnricher;
use crate::SourceError;

const SERVICE: &str = "OMDb";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    plot: Option<String>,
    #[serde(default)]
    poster: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn present(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty() && v != "N/A")
        .unwrap_or_default()
}

pub fn parse_response(body: &str) -> Result<Enrichment, SourceError> {
    let response: OmdbResponse = serde_json::from_str(body)?;
    if response.response.as_deref() == Some("False") {
        return Err(SourceError::Rejected {
            service: SERVICE.to_string(),
            message: response.error.unwrap_or_else(|| "lookup failed".to_string()),
        });
    }
    Ok(Enrichment {
        title: present(response.title),
        poster: present(response.poster),
        summary: present(response.plot),
    })
}

/// Poster and plot lookups by IMDb id
pub struct OmdbEnricher {
    client: Client,
    config: ConfigHandle,
}

impl OmdbEnricher {
    pub fn new(client: Client, config: ConfigHandle) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl MetadataEnricher for OmdbEnricher {
    async fn fetch(&self, imdb_id: &str) -> Result<Enrichment, SourceError> {
        let config = self
            .config
            .load()
            .map_err(|e| SourceError::Config(format!("{:#}", e)))?;
        let api_key = config
            .omdb_api_key()
            .ok_or_else(|| SourceError::NotConfigured("OMDb API key".to_string()))?;

        let response = self
            .client
            .get(config.enrichment.base_url.trim_end_matches('/'))
            .query(&[("apikey", api_key), ("i", imdb_id)])
            .send()
            .await?;
        let response = ensure_success(SERVICE, response).await?;
        let body = response.text().await?;
        parse_response(&body)
    }
}
