//! Publish-and-reconcile workflow.
//!
//! This module provides the two publishing entry points:
//!
//! - [`PagePublisher`]: reconcile one page — locate it (cache, then
//!   parent-scoped, then space-wide), then create, update, or skip based
//!   on a content fingerprint comparison.
//! - [`HierarchyPublisher`]: walk a [`DocumentNode`] tree breadth-first,
//!   reconciling each node with its parent's resolved id, and persist the
//!   page-id cache once at the end.
//!
//! # Example
//!
//! ```no_run
//! use docpub_cache::PageIdCache;
//! use docpub_confluence::{ConfluenceClient, PagePublisher, PublishRequest};
//!
//! let client = ConfluenceClient::new("https://wiki.example.com", "bot", "api-token");
//! let publisher = PagePublisher::new(&client, "DOCS")
//!     .with_base_url("https://wiki.example.com");
//!
//! let mut cache = PageIdCache::load(".docpub/page_id_cache.json".into());
//! let request = PublishRequest {
//!     title: "Automation Hub".to_owned(),
//!     content: "<p>hello</p>".to_owned(),
//!     ..PublishRequest::default()
//! };
//! let report = publisher.publish(&request, &mut cache)?;
//! cache.save()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`DocumentNode`]: docpub_docs::DocumentNode

mod hierarchy;
mod reconciler;
mod result;

pub use hierarchy::{HierarchyOptions, HierarchyPublisher};
pub use reconciler::{PROP_CONTENT_HASH, PROP_PREVIOUS_HASH, PagePublisher, PublishRequest};
pub use result::{PublishAction, PublishReport, REASON_EXCLUDED, REASON_UNCHANGED};
