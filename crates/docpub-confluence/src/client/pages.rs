//! Page operations for the Confluence API.

use serde::de::DeserializeOwned;
use tracing::info;

use super::ConfluenceClient;
use crate::api::ContentApi;
use crate::error::ConfluenceError;
use crate::types::{CreatePage, Page, SearchResults, UpdatePage};

impl ConfluenceClient {
    /// Read a response body as JSON, mapping error statuses.
    ///
    /// When `not_found` is given, a 404 maps to
    /// [`ConfluenceError::NotFound`] with that identifier; other error
    /// statuses map to [`ConfluenceError::HttpResponse`] with the raw body.
    fn read_response<T: DeserializeOwned>(
        response: ureq::http::Response<ureq::Body>,
        not_found: Option<&str>,
    ) -> Result<T, ConfluenceError> {
        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status == 404
            && let Some(id) = not_found
        {
            return Err(ConfluenceError::NotFound(id.to_owned()));
        }

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ConfluenceError::HttpResponse {
                status,
                body: error_body,
            });
        }

        Ok(body_reader.read_json()?)
    }
}

impl ContentApi for ConfluenceClient {
    fn get_page(&self, page_id: &str, expand: &[&str]) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content/{page_id}", self.api_url());

        let response = self
            .agent
            .get(&url)
            .query("expand", expand.join(","))
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        Self::read_response(response, Some(page_id))
    }

    fn find_pages(
        &self,
        space_key: &str,
        title: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<Page>, ConfluenceError> {
        let url = format!("{}/content", self.api_url());

        let mut request = self
            .agent
            .get(&url)
            .query("spaceKey", space_key)
            .query("title", title)
            .query("expand", "version,body.storage,ancestors,space");
        if let Some(parent) = parent_id {
            request = request.query("parentId", parent);
        }

        let response = request
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        let results: SearchResults = Self::read_response(response, None)?;
        Ok(results.results)
    }

    fn create_page(&self, request: &CreatePage) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content", self.api_url());

        info!(
            "creating page '{}' in space {}",
            request.title, request.space.key
        );

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send_json(request)?;

        Self::read_response(response, None)
    }

    fn update_page(&self, page_id: &str, request: &UpdatePage) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content/{page_id}", self.api_url());

        info!(
            "updating page '{}' (id={page_id}) to version {}",
            request.title, request.version.number
        );

        let response = self
            .agent
            .put(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send_json(request)?;

        Self::read_response(response, Some(page_id))
    }
}
