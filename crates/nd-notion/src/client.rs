//! Notion REST API client.
//!
//! Sync HTTP client with bearer-token auth, cursor pagination, and bounded
//! retry with fixed backoff for transient failures.

use std::thread;
use std::time::Duration;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::error::NotionError;
use crate::wire::{ChildrenResponse, RawBlock, RawPage};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Notion API root.
const API_BASE: &str = "https://api.notion.com/v1";

/// Notion-Version header value used when none is configured.
const DEFAULT_API_VERSION: &str = "2022-06-28";

/// Maximum attempts per request, counting the first.
const MAX_ATTEMPTS: u32 = 3;

/// Fixed delay between attempts.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Children page size (the API maximum).
const PAGE_SIZE: u32 = 100;

/// Notion REST API client.
pub struct NotionClient {
    agent: Agent,
    base_url: String,
    token: String,
    api_version: String,
}

impl NotionClient {
    /// Create a client for the public Notion API.
    #[must_use]
    pub fn new(token: impl Into<String>, api_version: Option<&str>) -> Self {
        Self::with_base_url(API_BASE, token, api_version)
    }

    /// Create a client against a custom base URL (used by tests).
    #[must_use]
    pub fn with_base_url(
        base_url: &str,
        token: impl Into<String>,
        api_version: Option<&str>,
    ) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.into(),
            api_version: api_version.unwrap_or(DEFAULT_API_VERSION).to_owned(),
        }
    }

    /// Retrieve a page record.
    pub fn get_page(&self, page_id: &str) -> Result<RawPage, NotionError> {
        debug!("retrieving page {page_id}");
        let url = format!("{}/pages/{page_id}", self.base_url);
        let value = self.get_json(&url)?;
        Ok(serde_json::from_value(value)?)
    }

    /// List all direct children of a block, following pagination.
    pub fn list_children(&self, block_id: &str) -> Result<Vec<RawBlock>, NotionError> {
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/blocks/{block_id}/children?page_size={PAGE_SIZE}",
                self.base_url
            );
            if let Some(cursor) = &cursor {
                let encoded = utf8_percent_encode(cursor, NON_ALPHANUMERIC);
                url.push_str(&format!("&start_cursor={encoded}"));
            }

            let value = self.get_json(&url)?;
            let page: ChildrenResponse = serde_json::from_value(value)?;
            results.extend(page.results);

            if !page.has_more {
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!("listed {} children of block {block_id}", results.len());
        Ok(results)
    }

    /// GET a JSON document, retrying transient failures.
    fn get_json(&self, url: &str) -> Result<Value, NotionError> {
        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                thread::sleep(RETRY_DELAY);
            }
            match self.get_once(url) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                    warn!("transient error on {url} (attempt {attempt}): {err}");
                }
                Err(err) => return Err(err),
            }
        }
        unreachable!("final attempt returns from the loop");
    }

    fn get_once(&self, url: &str) -> Result<Value, NotionError> {
        let response = self
            .agent
            .get(url)
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Notion-Version", &self.api_version)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let text = body
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(NotionError::Api { status, body: text });
        }

        Ok(body.read_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = NotionClient::with_base_url("https://api.example.com/", "tok", None);
        assert_eq!(client.base_url, "https://api.example.com");
    }

    #[test]
    fn test_default_api_version() {
        let client = NotionClient::new("tok", None);
        assert_eq!(client.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_explicit_api_version() {
        let client = NotionClient::new("tok", Some("2023-01-01"));
        assert_eq!(client.api_version, "2023-01-01");
    }
}
