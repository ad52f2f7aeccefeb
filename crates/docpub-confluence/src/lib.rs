//! Confluence publish-and-reconcile engine for docpub.
//!
//! Publishes documents to a Confluence-compatible wiki with
//! create-or-update-or-skip reconciliation:
//!
//! - [`ContentApi`]: the remote service seam ([`ConfluenceClient`] in
//!   production, an in-memory double in tests)
//! - [`ContentFingerprint`]: SHA-256 content hashes for change detection
//! - [`locate`]: cache-assisted page lookup with self-healing fallback
//! - [`PagePublisher`]: the per-page reconciler
//! - [`HierarchyPublisher`]: breadth-first publishing of a document tree
//! - [`validate_page`]: verification of published content against its
//!   stamped fingerprint

mod api;
mod client;
mod error;
mod fingerprint;
mod locator;
mod publisher;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;
mod validator;

pub use api::ContentApi;
pub use client::ConfluenceClient;
pub use error::ConfluenceError;
pub use fingerprint::ContentFingerprint;
pub use locator::{Located, locate};
pub use publisher::{
    HierarchyOptions, HierarchyPublisher, PROP_CONTENT_HASH, PROP_PREVIOUS_HASH, PagePublisher,
    PublishAction, PublishReport, PublishRequest, REASON_EXCLUDED, REASON_UNCHANGED,
};
pub use validator::{ValidationReport, validate_page};
