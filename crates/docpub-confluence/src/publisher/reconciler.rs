//! Page reconciler implementation.

use std::collections::BTreeMap;

use chrono::Utc;
use docpub_cache::PageIdCache;
use tracing::{info, warn};

use crate::api::ContentApi;
use crate::error::ConfluenceError;
use crate::fingerprint::ContentFingerprint;
use crate::locator::{Located, locate};
use crate::types::{
    Ancestor, Body, CreatePage, Label, Metadata, Page, PropertyValue, Space, Storage, UpdatePage,
    Version,
};

use super::result::{PublishAction, PublishReport, REASON_UNCHANGED};

/// Metadata property holding the fingerprint of the published content.
pub const PROP_CONTENT_HASH: &str = "content-hash";
/// Metadata property holding the fingerprint replaced by an update.
pub const PROP_PREVIOUS_HASH: &str = "previous-hash";
/// Metadata property naming the writer.
const PROP_UPDATED_BY: &str = "last-updated-by";
/// Metadata property holding the RFC 3339 write timestamp.
const PROP_TIMESTAMP: &str = "automation-timestamp";
/// Authorship marker stamped on every write.
const AUTOMATION_MARKER: &str = "docpub-automation";

/// One page to reconcile.
#[derive(Clone, Debug, Default)]
pub struct PublishRequest {
    /// Page title.
    pub title: String,
    /// Desired content body (storage format, published verbatim).
    pub content: String,
    /// Target space; falls back to the publisher's default space.
    pub space: Option<String>,
    /// Parent page id the page should attach under.
    pub parent_id: Option<String>,
    /// Labels applied to the page.
    pub labels: Vec<String>,
}

/// Reconciles a desired page against the remote: create when missing,
/// update when the content fingerprint differs, skip when identical.
pub struct PagePublisher<'a, C: ContentApi> {
    api: &'a C,
    space_key: String,
    base_url: Option<String>,
}

impl<'a, C: ContentApi> PagePublisher<'a, C> {
    /// Create a publisher targeting a default space.
    #[must_use]
    pub fn new(api: &'a C, space_key: impl Into<String>) -> Self {
        Self {
            api,
            space_key: space_key.into(),
            base_url: None,
        }
    }

    /// Set the server base URL used to build page URLs in reports.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Reconcile one page.
    ///
    /// Locates the page (4-step cache-assisted lookup), then creates,
    /// updates, or skips. Running twice with unchanged content yields
    /// `created` then `skipped`.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote call fails; the caller decides
    /// whether the batch continues (it does, for non-root pages).
    pub fn publish(
        &self,
        request: &PublishRequest,
        cache: &mut PageIdCache,
    ) -> Result<PublishReport, ConfluenceError> {
        let space_key = request.space.as_deref().unwrap_or(&self.space_key);
        let located = locate(
            self.api,
            cache,
            space_key,
            &request.title,
            request.parent_id.as_deref(),
        )?;
        let desired = ContentFingerprint::of(&request.content);

        match located {
            Located::NotFound => self.create(space_key, request, &desired, cache),
            Located::Found(page) => self.update(space_key, &page, request, &desired),
        }
    }

    /// Report what [`PagePublisher::publish`] would do, without mutating
    /// the remote. The cache may still self-heal during location.
    ///
    /// # Errors
    ///
    /// Returns an error if the space-wide lookup fails.
    pub fn dry_run(
        &self,
        request: &PublishRequest,
        cache: &mut PageIdCache,
    ) -> Result<PublishReport, ConfluenceError> {
        let space_key = request.space.as_deref().unwrap_or(&self.space_key);
        let located = locate(
            self.api,
            cache,
            space_key,
            &request.title,
            request.parent_id.as_deref(),
        )?;
        let desired = ContentFingerprint::of(&request.content);

        let mut report = match located {
            Located::NotFound => PublishReport::planned(PublishAction::Created, &request.title),
            Located::Found(page) => {
                let current = self.remote_fingerprint(&page.id);
                let mut report = if current.as_ref() == Some(&desired) {
                    let mut report =
                        PublishReport::planned(PublishAction::Skipped, &request.title);
                    report.reason = Some(REASON_UNCHANGED.to_owned());
                    report.version = Some(page.version.number);
                    report
                } else {
                    let mut report =
                        PublishReport::planned(PublishAction::Updated, &request.title);
                    report.previous_version = Some(page.version.number);
                    report.version = Some(page.version.number + 1);
                    report.previous_fingerprint =
                        Some(current.map_or_else(|| "unknown".to_owned(), |f| f.to_string()));
                    report
                };
                report.page_id = Some(page.id.clone());
                report.url = self.page_url(&page);
                report
            }
        };
        report.new_fingerprint = Some(desired.to_string());
        Ok(report)
    }

    fn create(
        &self,
        space_key: &str,
        request: &PublishRequest,
        desired: &ContentFingerprint,
        cache: &mut PageIdCache,
    ) -> Result<PublishReport, ConfluenceError> {
        if let Some(parent_id) = request.parent_id.as_deref() {
            self.validate_parent(parent_id, space_key)?;
        }

        let payload = CreatePage {
            content_type: "page".to_owned(),
            title: request.title.clone(),
            space: Space {
                key: space_key.to_owned(),
            },
            body: Body {
                storage: Some(Storage::new(request.content.clone())),
            },
            ancestors: request
                .parent_id
                .iter()
                .map(|id| Ancestor { id: id.clone() })
                .collect(),
            metadata: stamp_metadata(desired, None, &request.labels),
        };

        let page = self.api.create_page(&payload)?;
        cache.insert(space_key, &request.title, &page.id);
        info!("created page '{}' (id={})", request.title, page.id);

        let mut report = PublishReport::created(&request.title, &page.id, page.version.number);
        report.new_fingerprint = Some(desired.to_string());
        report.url = self.page_url(&page);
        Ok(report)
    }

    fn update(
        &self,
        space_key: &str,
        page: &Page,
        request: &PublishRequest,
        desired: &ContentFingerprint,
    ) -> Result<PublishReport, ConfluenceError> {
        // Compare against the page's current remote content, re-fetched by
        // id rather than trusted from the locate expansion
        let current = self.remote_fingerprint(&page.id);

        if current.as_ref() == Some(desired) {
            info!("no changes detected for '{}' (id={})", page.title, page.id);
            let mut report = PublishReport::skipped(&request.title, REASON_UNCHANGED);
            report.page_id = Some(page.id.clone());
            report.version = Some(page.version.number);
            report.url = self.page_url(page);
            return Ok(report);
        }

        let previous = current.map_or_else(|| "unknown".to_owned(), |f| f.to_string());
        let payload = UpdatePage {
            content_type: "page".to_owned(),
            title: page.title.clone(),
            space: Space {
                key: space_key.to_owned(),
            },
            body: Body {
                storage: Some(Storage::new(request.content.clone())),
            },
            version: Version {
                number: page.version.number + 1,
                message: None,
                when: None,
            },
            metadata: stamp_metadata(desired, Some(&previous), &request.labels),
        };

        let updated = self.api.update_page(&page.id, &payload)?;
        info!(
            "updated page '{}' (id={}) v{} -> v{}",
            page.title, page.id, page.version.number, updated.version.number
        );

        let mut report = PublishReport::updated(
            &request.title,
            &page.id,
            updated.version.number,
            page.version.number,
        );
        report.previous_fingerprint = Some(previous);
        report.new_fingerprint = Some(desired.to_string());
        report.url = self.page_url(&updated);
        Ok(report)
    }

    /// Check that a declared parent exists. A parent in a different space
    /// is an advisory warning only; a missing parent is a hard error for
    /// this page.
    fn validate_parent(&self, parent_id: &str, space_key: &str) -> Result<(), ConfluenceError> {
        match self.api.get_page(parent_id, &["space"]) {
            Ok(parent) => {
                if let Some(space) = &parent.space
                    && space.key != space_key
                {
                    warn!(
                        "parent page {parent_id} is in space '{}', but child will be in space '{space_key}'",
                        space.key
                    );
                }
                Ok(())
            }
            Err(ConfluenceError::NotFound(_)) => {
                Err(ConfluenceError::ParentMissing(parent_id.to_owned()))
            }
            Err(e) => Err(e),
        }
    }

    /// Fingerprint of the page's current remote content, or `None` when
    /// it cannot be fetched (treated as changed).
    fn remote_fingerprint(&self, page_id: &str) -> Option<ContentFingerprint> {
        match self.api.get_page(page_id, &["body.storage"]) {
            Ok(page) => Some(ContentFingerprint::of(page.body_storage())),
            Err(e) => {
                warn!("could not fetch current content of page {page_id}: {e}");
                None
            }
        }
    }

    fn page_url(&self, page: &Page) -> Option<String> {
        self.base_url.as_deref().and_then(|base| page.web_url(base))
    }
}

/// Build the metadata stamped on every write: content fingerprint,
/// authorship marker, timestamp, and (on updates) the replaced
/// fingerprint.
fn stamp_metadata(
    fingerprint: &ContentFingerprint,
    previous: Option<&str>,
    labels: &[String],
) -> Metadata {
    let mut properties = BTreeMap::new();
    properties.insert(
        PROP_CONTENT_HASH.to_owned(),
        PropertyValue::new(fingerprint.as_str()),
    );
    properties.insert(
        PROP_UPDATED_BY.to_owned(),
        PropertyValue::new(AUTOMATION_MARKER),
    );
    properties.insert(
        PROP_TIMESTAMP.to_owned(),
        PropertyValue::new(Utc::now().to_rfc3339()),
    );
    if let Some(previous) = previous {
        properties.insert(PROP_PREVIOUS_HASH.to_owned(), PropertyValue::new(previous));
    }

    Metadata {
        properties,
        labels: labels
            .iter()
            .map(|name| Label { name: name.clone() })
            .collect(),
    }
}
