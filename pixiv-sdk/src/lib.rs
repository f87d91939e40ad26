// ABOUTME: pixiv SDK library providing a typed client for the illustration metadata API
// ABOUTME: Supplies the image references the relay pipeline fetches and transcodes

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};

pub mod constants;
pub mod error;
pub mod illust_id;
pub mod types;

#[cfg(test)]
mod test_helpers;

pub use error::PixivError;
pub use illust_id::parse_illust_id;
pub use types::{Illust, IllustTags, IllustUrls, Tag};

use constants::{headers, timeouts, urls};
use types::ApiResponse;

pub struct PixivClient {
    client: reqwest::Client,
    base_url: String,
}

impl PixivClient {
    pub fn new() -> Result<Self, PixivError> {
        Self::with_base_url(urls::PIXIV_BASE)
    }

    /// Build a client against a different API root, e.g. a mirror or a test server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, PixivError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(headers::ACCEPT_LANGUAGE),
        );
        default_headers.insert(USER_AGENT, HeaderValue::from_static(headers::USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(timeouts::HTTP_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch metadata for a single illustration.
    pub async fn illust(&self, id: u64) -> Result<Illust, PixivError> {
        let url = format!("{}/ajax/illust/{}", self.base_url, id);
        log::debug!("Fetching illust metadata: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let data = response.bytes().await?;

        // pixiv reports API errors with a JSON envelope on 4xx as well, so
        // prefer its message over the bare status when it parses.
        let envelope: ApiResponse<serde_json::Value> = match serde_json::from_slice(&data) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(PixivError::Network(format!(
                    "HTTP request failed with status {}: {}",
                    status, url
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if envelope.is_error {
            return Err(PixivError::Api(envelope.message));
        }

        let body = envelope.body.ok_or(PixivError::InvalidResponse)?;
        let illust: Illust = serde_json::from_value(body)?;

        if !illust.urls.is_available() {
            return Err(PixivError::Api(format!(
                "illust {} has no accessible image URLs",
                illust.illust_id
            )));
        }

        log::debug!(
            "Fetched illust {} ({}x{}, {} page(s))",
            illust.illust_id,
            illust.width,
            illust.height,
            illust.page_count
        );
        Ok(illust)
    }
}
