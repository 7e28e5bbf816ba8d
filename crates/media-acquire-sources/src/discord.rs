use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use media_acquire_models::{NotificationEvent, NotificationKind};
use reqwest::Client;
use serde_json::{json, Value};

use crate::http::status_error;
use crate::traits::NotificationProvider;
use crate::SourceError;

const SERVICE: &str = "Discord";
const EMBED_COLOR: u32 = 0x00ff00;
const MAX_DESCRIPTION: usize = 4000;

/// Discord webhook notifications
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
    username: Option<String>,
}

impl DiscordNotifier {
    pub fn new(client: Client, webhook_url: impl Into<String>, username: Option<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
            username,
        }
    }

    /// Webhook payload carrying a single embed
    pub fn payload(&self, event: &NotificationEvent, now: DateTime<Utc>) -> Value {
        let heading = match event.kind {
            NotificationKind::MovieAdded => "Movie added",
            NotificationKind::ShowAdded => "Show added",
        };
        let or_na = |value: String| if value.is_empty() { "N/A".to_string() } else { value };
        let description: String = event.overview.chars().take(MAX_DESCRIPTION).collect();
        let year = or_na(event.year.map(|y| y.to_string()).unwrap_or_default());
        let rating = or_na(event.rating.map(|r| format!("{:.1}", r)).unwrap_or_default());

        let mut embed = json!({
            "title": event.title,
            "description": description,
            "color": EMBED_COLOR,
            "author": { "name": "marquee" },
            "footer": { "text": heading },
            "fields": [
                { "name": "Year", "value": year, "inline": true },
                { "name": "Genre", "value": or_na(event.genres.join(", ")), "inline": true },
                { "name": "Rating", "value": rating, "inline": true },
            ],
            "timestamp": now.to_rfc3339_opts(SecondsFormat::Secs, true),
        });
        if !event.poster_url.is_empty() {
            embed["thumbnail"] = json!({ "url": event.poster_url });
        }
        if let Some(imdb) = &event.imdb_id {
            embed["url"] = json!(format!("https://www.imdb.com/title/{}/", imdb));
        }

        let mut payload = json!({ "embeds": [embed] });
        if let Some(username) = self.username.as_ref().filter(|u| !u.is_empty()) {
            payload["username"] = json!(username);
        }
        payload
    }
}

#[async_trait]
impl NotificationProvider for DiscordNotifier {
    fn provider_name(&self) -> &str {
        "discord"
    }

    async fn send(&self, event: &NotificationEvent) -> Result<(), SourceError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&self.payload(event, Utc::now()))
            .send()
            .await?;
        let status = response.status().as_u16();
        if status == 204 || status == 200 {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(SERVICE, status, body))
    }
}
