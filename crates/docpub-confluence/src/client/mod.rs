//! Confluence REST API client.
//!
//! Provides a sync HTTP client for the Confluence REST API with basic
//! authentication (username + API token).

mod pages;

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use ureq::Agent;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl ConfluenceClient {
    /// Create client from config values.
    ///
    /// # Arguments
    /// * `base_url` - Confluence server base URL
    /// * `username` - Account username (or email for cloud instances)
    /// * `api_token` - API token used with basic authentication
    #[must_use]
    pub fn new(base_url: &str, username: &str, api_token: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        let credentials = BASE64_STANDARD.encode(format!("{username}:{api_token}"));

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_header: format!("Basic {credentials}"),
        }
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }

    /// Get the server base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
