//! Category-to-parent-page resolution.
//!
//! Config declares a hierarchy root page id and named categories, each
//! with a `parent` reference (`"root"` or another category name). Front
//! matter names a category; this module resolves it to the parent page id
//! the reconciler should attach the page under.

use docpub_config::HierarchyConfig;

/// Resolve a category key to a parent page id.
///
/// - `"root"` resolves to the configured root page id.
/// - A category whose parent is `"root"` resolves likewise.
/// - A category pointing at another category falls back to the root page
///   id with an advisory warning (nested resolution is single-level).
/// - An unknown category or parent reference resolves to `None`.
#[must_use]
pub fn resolve_parent(hierarchy: &HierarchyConfig, category_key: &str) -> Option<String> {
    if hierarchy.root_page_id.is_none() && hierarchy.categories.is_empty() {
        tracing::warn!("no hierarchy configured; cannot resolve category '{category_key}'");
        return None;
    }

    if category_key == "root" {
        let root = hierarchy.root_page_id.clone();
        if root.is_none() {
            tracing::error!("root page id not configured in hierarchy");
        }
        return root;
    }

    let Some(category) = hierarchy.categories.get(category_key) else {
        tracing::error!(
            "category '{category_key}' not found in hierarchy (available: {:?})",
            hierarchy.categories.keys().collect::<Vec<_>>()
        );
        return None;
    };

    if category.parent == "root" {
        let root = hierarchy.root_page_id.clone();
        if root.is_none() {
            tracing::error!("root page id not configured for category '{category_key}'");
        }
        root
    } else if hierarchy.categories.contains_key(&category.parent) {
        // Single-level resolution only; deeper nesting attaches to root
        tracing::warn!(
            "nested category resolution not supported for '{}', falling back to root for '{category_key}'",
            category.parent
        );
        hierarchy.root_page_id.clone()
    } else {
        tracing::error!(
            "unknown parent reference '{}' for category '{category_key}'",
            category.parent
        );
        None
    }
}
