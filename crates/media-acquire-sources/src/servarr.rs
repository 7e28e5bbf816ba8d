use async_trait::async_trait;
use media_acquire_models::{
    DirectManagerConfig, ManagerRequest, MediaKind, QualityProfile, RootFolder, SubmitStatus,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::http::{ensure_success, join_url, status_error};
use crate::traits::DirectManager;
use crate::SourceError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidationFailure {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Radarr (movies) or Sonarr (shows) v3 API
pub struct ServarrManager {
    client: Client,
    kind: MediaKind,
    config: DirectManagerConfig,
}

impl ServarrManager {
    pub fn new(client: Client, kind: MediaKind, config: DirectManagerConfig) -> Self {
        Self { client, kind, config }
    }

    pub fn service_name(kind: MediaKind) -> &'static str {
        match kind {
            MediaKind::Movie => "Radarr",
            MediaKind::Show => "Sonarr",
        }
    }

    fn exists_code(kind: MediaKind) -> &'static str {
        match kind {
            MediaKind::Movie => "MovieExistsValidator",
            MediaKind::Show => "SeriesExistsValidator",
        }
    }

    pub fn add_body(request: &ManagerRequest) -> Value {
        match request.kind {
            MediaKind::Movie => json!({
                "title": request.title,
                "tmdbId": request.external_id,
                "year": request.year,
                "qualityProfileId": request.quality_profile_id,
                "rootFolderPath": request.root_folder_path,
                "monitored": true,
                "minimumAvailability": request.minimum_availability,
                "addOptions": { "searchForMovie": true },
            }),
            MediaKind::Show => json!({
                "title": request.title,
                "tvdbId": request.external_id,
                "year": request.year,
                "qualityProfileId": request.quality_profile_id,
                "rootFolderPath": request.root_folder_path,
                "monitored": true,
                "seasonFolder": true,
                "addOptions": { "searchForMissingEpisodes": true },
            }),
        }
    }

    /// Classify the response to an add request
    pub fn classify_add(
        kind: MediaKind,
        status: u16,
        body: &str,
    ) -> Result<SubmitStatus, SourceError> {
        if (200..300).contains(&status) {
            return Ok(SubmitStatus::Created);
        }
        if status == 400 || status == 409 {
            if let Ok(failures) = serde_json::from_str::<Vec<ValidationFailure>>(body) {
                let exists = failures.iter().any(|f| {
                    f.error_code.as_deref() == Some(Self::exists_code(kind))
                        || f.error_message
                            .as_deref()
                            .is_some_and(|m| m.to_lowercase().contains("already been added"))
                });
                if exists {
                    return Ok(SubmitStatus::AlreadyExists);
                }
            }
        }
        Err(status_error(Self::service_name(kind), status, body.to_string()))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = join_url(&self.config.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.config.api_key)
            .send()
            .await?;
        let response = ensure_success(Self::service_name(self.kind), response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl DirectManager for ServarrManager {
    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, SourceError> {
        self.get_json("api/v3/qualityprofile").await
    }

    async fn root_folders(&self) -> Result<Vec<RootFolder>, SourceError> {
        self.get_json("api/v3/rootfolder").await
    }

    async fn request(&self, request: &ManagerRequest) -> Result<SubmitStatus, SourceError> {
        let path = match request.kind {
            MediaKind::Movie => "api/v3/movie",
            MediaKind::Show => "api/v3/series",
        };
        let url = join_url(&self.config.base_url, path);
        debug!(
            url = %url,
            external_id = request.external_id,
            title = %request.title,
            "Adding to manager"
        );

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.config.api_key)
            .json(&Self::add_body(request))
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Self::classify_add(request.kind, status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: MediaKind) -> ManagerRequest {
        ManagerRequest {
            kind,
            title: "Severance".to_string(),
            year: Some(2022),
            external_id: 371980,
            quality_profile_id: 6,
            root_folder_path: "/tv".to_string(),
            minimum_availability: "released".to_string(),
        }
    }

    #[test]
    fn test_movie_body() {
        let body = ServarrManager::add_body(&request(MediaKind::Movie));
        assert_eq!(body["tmdbId"], 371980);
        assert_eq!(body["minimumAvailability"], "released");
        assert_eq!(body["addOptions"]["searchForMovie"], true);
        assert!(body.get("tvdbId").is_none());
    }

    #[test]
    fn test_series_body() {
        let body = ServarrManager::add_body(&request(MediaKind::Show));
        assert_eq!(body["tvdbId"], 371980);
        assert_eq!(body["seasonFolder"], true);
        assert_eq!(body["addOptions"]["searchForMissingEpisodes"], true);
        assert!(body.get("minimumAvailability").is_none());
    }

    #[test]
    fn test_classify_exists_validators() {
        let movie = r#"[{"propertyName": "TmdbId", "errorMessage": "This movie has already been added", "errorCode": "MovieExistsValidator"}]"#;
        assert_eq!(
            ServarrManager::classify_add(MediaKind::Movie, 400, movie).unwrap(),
            SubmitStatus::AlreadyExists
        );
        let series = r#"[{"propertyName": "TvdbId", "errorCode": "SeriesExistsValidator"}]"#;
        assert_eq!(
            ServarrManager::classify_add(MediaKind::Show, 400, series).unwrap(),
            SubmitStatus::AlreadyExists
        );
    }

    #[test]
    fn test_classify_other_failures() {
        assert_eq!(
            ServarrManager::classify_add(MediaKind::Movie, 201, "{}").unwrap(),
            SubmitStatus::Created
        );
        let invalid = r#"[{"propertyName": "RootFolderPath", "errorCode": "RootFolderValidator", "errorMessage": "Invalid path"}]"#;
        assert!(matches!(
            ServarrManager::classify_add(MediaKind::Movie, 400, invalid),
            Err(SourceError::Status { status: 400, .. })
        ));
        assert!(matches!(
            ServarrManager::classify_add(MediaKind::Show, 401, ""),
            Err(SourceError::Unauthorized { .. })
        ));
    }
}
