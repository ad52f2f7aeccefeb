//! YAML front matter parsing.
//!
//! Documents may start with a `---`-delimited YAML block carrying a
//! `confluence:` table that configures how the page is published:
//!
//! ```markdown
//! ---
//! confluence:
//!   title: Incident Response
//!   category: operations
//!   labels: [runbook]
//! ---
//! # Incident Response
//! ```
//!
//! Malformed front matter is an advisory warning, never an error: the file
//! is treated as having no front matter and its full content (delimiters
//! included) is kept as the body.

use serde::Deserialize;

/// Parsed front matter block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FrontMatter {
    /// Publishing configuration for this document.
    #[serde(default)]
    pub confluence: Option<ConfluenceMeta>,
}

/// The `confluence:` table of a document's front matter.
///
/// All fields are optional; unset fields fall back to values derived from
/// the file path or the workspace configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ConfluenceMeta {
    /// Page title (overrides the title derived from the file stem).
    #[serde(default)]
    pub title: Option<String>,

    /// Target space key (overrides the configured default space).
    #[serde(default)]
    pub space: Option<String>,

    /// Hierarchy category naming the parent page.
    #[serde(default)]
    pub category: Option<String>,

    /// Labels applied to the page in addition to the configured defaults.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Exclude this document from publishing.
    #[serde(default)]
    pub exclude: bool,
}

/// Split a document into its front matter and body.
///
/// Returns the parsed front matter and the body with the block stripped.
/// Documents without a leading `---` line, with an unterminated block, or
/// with YAML that fails to parse are returned unchanged with default front
/// matter (the parse failure is logged as a warning).
#[must_use]
pub fn parse_front_matter(content: &str) -> (FrontMatter, &str) {
    let Some(after_open) = content.strip_prefix("---") else {
        return (FrontMatter::default(), content);
    };

    let Some((raw_yaml, body)) = after_open.split_once("---") else {
        return (FrontMatter::default(), content);
    };

    if raw_yaml.trim().is_empty() {
        return (FrontMatter::default(), body.trim_start_matches(['\r', '\n']));
    }

    match serde_yaml::from_str::<FrontMatter>(raw_yaml) {
        Ok(front) => (front, body.trim_start_matches(['\r', '\n'])),
        Err(e) => {
            tracing::warn!("failed to parse front matter: {e}");
            (FrontMatter::default(), content)
        }
    }
}
