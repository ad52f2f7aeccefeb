//! Publish outcome reporting.

use serde::Serialize;

/// Skip reason: the remote content already matches.
pub const REASON_UNCHANGED: &str = "no-content-changes";
/// Skip reason: the node is excluded by configuration.
pub const REASON_EXCLUDED: &str = "excluded-by-config";

/// Action taken for one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishAction {
    /// A new page was created.
    Created,
    /// The existing page was updated to a new version.
    Updated,
    /// No remote mutation was needed or allowed.
    Skipped,
    /// Reconciliation of this page failed; the batch continues.
    Error,
}

/// Outcome of reconciling one page, serialized into the batch report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// Action taken.
    pub action: PublishAction,
    /// Page title.
    pub title: String,
    /// Remote page id, when resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    /// Page version after the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Version before an update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<u32>,
    /// Skip reason ([`REASON_UNCHANGED`] or [`REASON_EXCLUDED`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Fingerprint of the content replaced by an update
    /// (`"unknown"` when the previous content could not be fetched).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_fingerprint: Option<String>,
    /// Fingerprint of the published content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_fingerprint: Option<String>,
    /// Failure description for [`PublishAction::Error`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Web UI URL of the page, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Set when the report describes what *would* happen (no remote
    /// mutation was performed).
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

impl PublishReport {
    fn base(action: PublishAction, title: &str) -> Self {
        Self {
            action,
            title: title.to_owned(),
            page_id: None,
            version: None,
            previous_version: None,
            reason: None,
            previous_fingerprint: None,
            new_fingerprint: None,
            error: None,
            url: None,
            dry_run: false,
        }
    }

    /// Report a created page.
    #[must_use]
    pub fn created(title: &str, page_id: &str, version: u32) -> Self {
        Self {
            page_id: Some(page_id.to_owned()),
            version: Some(version),
            ..Self::base(PublishAction::Created, title)
        }
    }

    /// Report an updated page.
    #[must_use]
    pub fn updated(title: &str, page_id: &str, version: u32, previous_version: u32) -> Self {
        Self {
            page_id: Some(page_id.to_owned()),
            version: Some(version),
            previous_version: Some(previous_version),
            ..Self::base(PublishAction::Updated, title)
        }
    }

    /// Report a skipped page.
    #[must_use]
    pub fn skipped(title: &str, reason: &str) -> Self {
        Self {
            reason: Some(reason.to_owned()),
            ..Self::base(PublishAction::Skipped, title)
        }
    }

    /// Report a failed page.
    #[must_use]
    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::base(PublishAction::Error, title)
        }
    }

    /// Report what a dry run *would* do.
    #[must_use]
    pub fn planned(action: PublishAction, title: &str) -> Self {
        Self {
            dry_run: true,
            ..Self::base(action, title)
        }
    }

    /// Whether the report carries a resolved page id.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.page_id.is_some()
    }
}
