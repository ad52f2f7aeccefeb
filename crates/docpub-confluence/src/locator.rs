//! Page location with cache-assisted lookup.
//!
//! Resolves a `(space, title)` pair to a remote page, trying the cheapest
//! route first:
//!
//! 1. Cached page id -> fetch by id (one call). A stale id is removed
//!    from the cache and the search continues; this step never fails the
//!    lookup.
//! 2. Parent-scoped title query, when a parent id is known. Disambiguates
//!    same-titled pages across parents. Query failures fall through.
//! 3. Space-wide title query. Tolerates parent drift and first-run cache
//!    misses.
//!
//! Lookups that succeed without the cache populate it for the next run.

use docpub_cache::PageIdCache;
use tracing::{debug, info, warn};

use crate::api::ContentApi;
use crate::error::ConfluenceError;
use crate::types::Page;

/// Representations expanded on located pages.
const LOCATE_EXPAND: &[&str] = &["version", "body.storage", "ancestors"];

/// Outcome of a page lookup.
#[derive(Debug)]
pub enum Located {
    /// The page exists remotely.
    Found(Box<Page>),
    /// No page with this title exists in the space.
    NotFound,
}

/// Resolve a title to a remote page.
///
/// # Errors
///
/// Returns an error only if the space-wide query fails; cache-hit fetch
/// failures and parent-scoped query failures are recovered locally.
pub fn locate(
    api: &impl ContentApi,
    cache: &mut PageIdCache,
    space_key: &str,
    title: &str,
    parent_id: Option<&str>,
) -> Result<Located, ConfluenceError> {
    let cached = cache.get(space_key, title).map(str::to_owned);
    if let Some(page_id) = cached {
        debug!("checking cached page id {page_id} for '{title}'");
        match api.get_page(&page_id, LOCATE_EXPAND) {
            Ok(page) => {
                info!("found page '{title}' using cached id {page_id}");
                return Ok(Located::Found(Box::new(page)));
            }
            Err(e) => {
                warn!("cached page id {page_id} for '{title}' no longer resolves ({e}), removing");
                cache.remove(space_key, title);
            }
        }
    }

    if let Some(parent) = parent_id {
        match api.find_pages(space_key, title, Some(parent)) {
            Ok(results) => {
                if let Some(page) = results.into_iter().next() {
                    info!("found page '{title}' under parent {parent}");
                    cache.insert(space_key, title, &page.id);
                    return Ok(Located::Found(Box::new(page)));
                }
            }
            Err(e) => {
                debug!("parent-scoped search for '{title}' failed ({e}), trying space-wide");
            }
        }
    }

    let results = api.find_pages(space_key, title, None)?;
    match results.into_iter().next() {
        Some(page) => {
            info!("found page '{title}' in space {space_key}");
            cache.insert(space_key, title, &page.id);
            Ok(Located::Found(Box::new(page)))
        }
        None => {
            debug!("page '{title}' not found in space {space_key}");
            Ok(Located::NotFound)
        }
    }
}
