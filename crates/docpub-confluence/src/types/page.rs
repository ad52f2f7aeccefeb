//! Confluence page types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Confluence page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Content type (always "page").
    #[serde(rename = "type", default)]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
    /// Space the page lives in.
    #[serde(default)]
    pub space: Option<Space>,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
    /// Ancestors, root first; the last entry is the direct parent.
    #[serde(default)]
    pub ancestors: Vec<Ancestor>,
    /// Page metadata (properties and labels).
    #[serde(default)]
    pub metadata: Option<Metadata>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

impl Page {
    /// Storage-format body content, or `""` if the body was not expanded.
    #[must_use]
    pub fn body_storage(&self) -> &str {
        self.body
            .as_ref()
            .and_then(|b| b.storage.as_ref())
            .map_or("", |s| s.value.as_str())
    }

    /// Web UI URL for the page, joined onto `base_url`.
    #[must_use]
    pub fn web_url(&self, base_url: &str) -> Option<String> {
        let webui = self.links.as_ref()?.webui.as_ref()?;
        Some(format!("{base_url}{webui}"))
    }
}

/// Page version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
    /// Version message/comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Timestamp of the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
}

/// Space reference.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Space {
    /// Space key.
    pub key: String,
}

/// Page body content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Body {
    /// Storage format content.
    #[serde(default)]
    pub storage: Option<Storage>,
}

/// Storage format representation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Storage {
    /// Content in Confluence storage format.
    pub value: String,
    /// Content representation (always "storage").
    pub representation: String,
}

impl Storage {
    /// Wrap content in the storage representation.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            representation: "storage".to_owned(),
        }
    }
}

/// Ancestor (parent) reference.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ancestor {
    /// Page ID of the ancestor.
    pub id: String,
}

/// Page metadata: arbitrary string properties plus labels.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Metadata {
    /// Key-value properties.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
    /// Labels attached to the page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

impl Metadata {
    /// Look up a property value by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|p| p.value.as_str())
    }
}

/// A single metadata property value.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PropertyValue {
    /// Property value.
    pub value: String,
}

impl PropertyValue {
    /// Wrap a string as a property value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Page label.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Label {
    /// Label name.
    pub name: String,
}

/// Hypermedia links.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Links {
    /// Web UI link.
    #[serde(default)]
    pub webui: Option<String>,
    /// API self link.
    #[serde(rename = "self", default)]
    pub self_link: Option<String>,
}

/// Result list from a content query.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    /// Matching pages.
    pub results: Vec<Page>,
    /// Result count.
    #[serde(default)]
    pub size: Option<u32>,
}

/// Payload for creating a page.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePage {
    /// Content type (always "page").
    #[serde(rename = "type")]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Target space.
    pub space: Space,
    /// Page body.
    pub body: Body,
    /// Parent reference; empty means a space-root page.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<Ancestor>,
    /// Metadata stamped on the new page.
    pub metadata: Metadata,
}

/// Payload for updating a page.
///
/// The page id travels in the request URL; the payload carries the new
/// version number for the remote's optimistic concurrency check.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePage {
    /// Content type (always "page").
    #[serde(rename = "type")]
    pub content_type: String,
    /// Page title (unchanged on content-only updates).
    pub title: String,
    /// Target space.
    pub space: Space,
    /// New page body.
    pub body: Body,
    /// New version: current version + 1.
    pub version: Version,
    /// Metadata stamped on the updated page.
    pub metadata: Metadata,
}
