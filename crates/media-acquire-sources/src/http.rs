use reqwest::{Client, Response};
use std::time::Duration;

use crate::SourceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY: usize = 500;

/// Shared HTTP client; every outbound call is bounded by a timeout
pub fn build_client() -> Client {
    Client::builder()
        .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub(crate) fn status_error(service: &str, status: u16, body: String) -> SourceError {
    if status == 401 {
        return SourceError::Unauthorized {
            service: service.to_string(),
        };
    }
    let body = if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &body[..cut])
    } else {
        body
    };
    SourceError::Status {
        service: service.to_string(),
        status,
        body,
    }
}

/// Pass 2xx responses through, turn everything else into a typed error
pub(crate) async fn ensure_success(
    service: &str,
    response: Response,
) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(service, status.as_u16(), body))
}
