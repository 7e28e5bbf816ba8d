use async_trait::async_trait;
use media_acquire_models::{BrokerRequest, MediaKind, RequestBrokerConfig, SubmitStatus};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http::{join_url, status_error};
use crate::traits::RequestBroker;
use crate::SourceError;

const SERVICE: &str = "Ombi";
const ALREADY_REQUESTED_CODES: [&str; 2] = ["MovieAlreadyRequested", "AlreadyRequested"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OmbiRequestBody {
    the_movie_db_id: u64,
    language_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_on_behalf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    root_folder_override: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality_path_override: Option<u32>,
    is4k_request: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_all: Option<bool>,
}

impl From<&BrokerRequest> for OmbiRequestBody {
    fn from(request: &BrokerRequest) -> Self {
        Self {
            the_movie_db_id: request.tmdb_id,
            language_code: request.language_code.clone(),
            request_on_behalf: request.user_id.clone(),
            root_folder_override: request.root_folder_override,
            quality_path_override: request.quality_override,
            is4k_request: false,
            request_all: match request.kind {
                MediaKind::Movie => None,
                MediaKind::Show => Some(true),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OmbiRequestResponse {
    result: bool,
    message: Option<String>,
    is_error: bool,
    error_message: Option<String>,
    error_code: Option<String>,
}

/// Classify an Ombi request response; duplicate requests are not errors
pub fn classify_response(status: u16, body: &str) -> Result<SubmitStatus, SourceError> {
    let parsed: Option<OmbiRequestResponse> = serde_json::from_str(body).ok();

    if let Some(response) = &parsed {
        let code_matches = response
            .error_code
            .as_deref()
            .is_some_and(|code| ALREADY_REQUESTED_CODES.contains(&code));
        let says_already = [&response.error_message, &response.message]
            .iter()
            .filter_map(|m| m.as_deref())
            .any(|m| m.to_lowercase().contains("already"));
        if code_matches || (response.is_error && says_already) {
            return Ok(SubmitStatus::AlreadyExists);
        }
    }

    if !(200..300).contains(&status) {
        return Err(status_error(SERVICE, status, body.to_string()));
    }

    match parsed {
        Some(response)
            if response.is_error || (!response.result && response.error_message.is_some()) =>
        {
            Err(SourceError::Rejected {
                service: SERVICE.to_string(),
                message: response
                    .error_message
                    .or(response.message)
                    .unwrap_or_else(|| "request failed".to_string()),
            })
        }
        _ => Ok(SubmitStatus::Created),
    }
}

/// Request broker backed by Ombi's v1 request API
pub struct OmbiBroker {
    client: Client,
    config: RequestBrokerConfig,
}

impl OmbiBroker {
    pub fn new(client: Client, config: RequestBrokerConfig) -> Self {
        Self { client, config }
    }

    fn request_path(kind: MediaKind) -> &'static str {
        match kind {
            MediaKind::Movie => "api/v1/Request/movie",
            MediaKind::Show => "api/v1/Request/tv",
        }
    }
}

#[async_trait]
impl RequestBroker for OmbiBroker {
    async fn request(&self, request: &BrokerRequest) -> Result<SubmitStatus, SourceError> {
        let url = join_url(&self.config.base_url, Self::request_path(request.kind));
        debug!(
            url = %url,
            tmdb_id = request.tmdb_id,
            title = %request.title,
            "Submitting Ombi request"
        );

        let response = self
            .client
            .post(&url)
            .header("ApiKey", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&OmbiRequestBody::from(request))
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        classify_response(status, &body)
    }
}
