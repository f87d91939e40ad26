// ABOUTME: Blocking HTTP client that fetches a single image with the referer the host requires
// ABOUTME: Returns the full body and declared content type; retries belong to the transport

use crate::constants::http;
use crate::error::RelayError;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, REFERER};
use std::time::Duration;

/// Raw response of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// `Content-Type` exactly as the server sent it; empty when absent.
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    referer: String,
}

impl Fetcher {
    /// Build a fetcher with no request timeout: a fetch runs until it
    /// completes or the transport fails.
    pub fn new() -> Result<Self, RelayError> {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(http::USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(http::MAX_REDIRECTS))
            .build()
            .map_err(|e| RelayError::transport("Failed to create HTTP client", e))?;

        Ok(Self::with_client(client))
    }

    /// Use a caller-configured transport (deadlines, proxies, TLS settings).
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            referer: http::REFERER.to_string(),
        }
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    pub fn referer(&self) -> &str {
        &self.referer
    }

    pub fn fetch(&self, url: &str) -> Result<FetchedImage, RelayError> {
        log::debug!("Fetching image: {}", url);

        let response = self
            .client
            .get(url)
            .header(REFERER, &self.referer)
            .send()
            .map_err(|e| RelayError::transport(format!("HTTP request failed for {}", url), e))?;

        if !response.status().is_success() {
            return Err(RelayError::network(format!(
                "HTTP request failed with status {}: {}",
                response.status(),
                url
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response
            .bytes()
            .map_err(|e| {
                RelayError::transport(format!("Failed to read response body from {}", url), e)
            })?
            .to_vec();

        log::debug!(
            "Fetched {} ({}, {} bytes)",
            url,
            if content_type.is_empty() {
                "no content-type"
            } else {
                content_type.as_str()
            },
            bytes.len()
        );

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}
