//! Published-content validation.
//!
//! Verifies that a live page matches what the publisher stamped on it:
//! the current body is fingerprinted and compared against the page's
//! stored `content-hash` metadata property, and optionally against an
//! expected fingerprint supplied by the caller.

use serde::Serialize;

use crate::api::ContentApi;
use crate::error::ConfluenceError;
use crate::fingerprint::ContentFingerprint;
use crate::publisher::PROP_CONTENT_HASH;

/// Representations needed to validate a page.
const VALIDATE_EXPAND: &[&str] = &["body.storage", "version", "metadata.properties"];

/// Result of validating one page's live content.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationReport {
    /// Page id.
    pub page_id: String,
    /// Page title.
    pub title: String,
    /// Current version number.
    pub version: u32,
    /// Fingerprint of the live content.
    pub content_fingerprint: String,
    /// Length of the live content in bytes.
    pub content_length: usize,
    /// Timestamp of the current version, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// `content-hash` property stamped by the publisher, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_fingerprint: Option<String>,
    /// Whether the live content matches the stored property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_matches: Option<bool>,
    /// Expected fingerprint supplied by the caller, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_fingerprint: Option<String>,
    /// Whether the live content matches the expected fingerprint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_matches_expected: Option<bool>,
}

/// Validate a page's live content against its stored fingerprint.
///
/// # Errors
///
/// Returns [`ConfluenceError::NotFound`] if the page does not exist, or
/// any other [`ConfluenceError`] if the fetch fails.
pub fn validate_page(
    api: &impl ContentApi,
    page_id: &str,
    expected: Option<&str>,
) -> Result<ValidationReport, ConfluenceError> {
    let page = api.get_page(page_id, VALIDATE_EXPAND)?;

    let content = page.body_storage();
    let fingerprint = ContentFingerprint::of(content);

    let stored = page
        .metadata
        .as_ref()
        .and_then(|m| m.property(PROP_CONTENT_HASH))
        .map(str::to_owned);

    Ok(ValidationReport {
        page_id: page.id.clone(),
        title: page.title.clone(),
        version: page.version.number,
        content_length: content.len(),
        last_modified: page.version.when.clone(),
        fingerprint_matches: stored
            .as_deref()
            .map(|stored| stored == fingerprint.as_str()),
        stored_fingerprint: stored,
        expected_fingerprint: expected.map(str::to_owned),
        content_matches_expected: expected.map(|e| e == fingerprint.as_str()),
        content_fingerprint: fingerprint.to_string(),
    })
}
