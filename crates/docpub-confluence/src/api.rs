//! Remote content service interface.
//!
//! [`ContentApi`] is the seam between the reconcile logic and the wire:
//! production code talks to Confluence through [`ConfluenceClient`]
//! (which implements this trait), tests use an in-memory double. The
//! operations are exactly those the publish workflow needs.
//!
//! [`ConfluenceClient`]: crate::ConfluenceClient

use crate::error::ConfluenceError;
use crate::types::{CreatePage, Page, UpdatePage};

/// Operations on the remote content service.
///
/// A missing page is reported as [`ConfluenceError::NotFound`],
/// distinguishable from transport failures and other HTTP errors.
pub trait ContentApi {
    /// Fetch a page by id, expanding the named representations
    /// (e.g. `version`, `body.storage`, `ancestors`).
    fn get_page(&self, page_id: &str, expand: &[&str]) -> Result<Page, ConfluenceError>;

    /// List pages matching a space and title, optionally scoped to a
    /// parent page. Returns an empty list when nothing matches.
    fn find_pages(
        &self,
        space_key: &str,
        title: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<Page>, ConfluenceError>;

    /// Create a page.
    fn create_page(&self, request: &CreatePage) -> Result<Page, ConfluenceError>;

    /// Update a page. The payload's version number must be the current
    /// version + 1; the remote rejects the update otherwise (optimistic
    /// concurrency).
    fn update_page(&self, page_id: &str, request: &UpdatePage) -> Result<Page, ConfluenceError>;
}
