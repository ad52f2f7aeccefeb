//! Document discovery and front matter for docpub.
//!
//! This crate turns a directory of markdown files into the
//! [`DocumentNode`] tree the publisher walks:
//!
//! - [`frontmatter`]: YAML front matter parsing (`confluence:` table)
//! - [`discovery`]: recursive section discovery over a docs directory
//! - [`hierarchy`]: category-to-parent-page resolution from config
//! - [`node`]: the publish tree model

pub mod discovery;
pub mod frontmatter;
pub mod hierarchy;
mod node;

pub use discovery::{DiscoveredSection, discover_tree};
pub use frontmatter::{ConfluenceMeta, FrontMatter, parse_front_matter};
pub use hierarchy::resolve_parent;
pub use node::DocumentNode;

/// Error from document discovery.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    /// I/O error walking the docs directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Docs source directory does not exist.
    #[error("docs directory not found: {0}")]
    SourceMissing(String),
}
