//! Hierarchy publisher: breadth-first walk over a document tree.

use std::collections::VecDeque;
use std::fs;

use docpub_cache::PageIdCache;
use docpub_docs::{DocumentNode, parse_front_matter};
use tracing::{error, info, warn};

use crate::api::ContentApi;
use crate::locator::{Located, locate};

use super::reconciler::{PagePublisher, PublishRequest};
use super::result::{PublishAction, PublishReport, REASON_EXCLUDED};

/// Options controlling a hierarchy walk.
#[derive(Clone, Debug)]
pub struct HierarchyOptions {
    /// Resolve excluded nodes to existing remote pages so their children
    /// still acquire a parent id.
    pub use_existing_pages: bool,
    /// Labels applied to every published page, ahead of per-node labels.
    pub labels: Vec<String>,
    /// Walk and report without mutating the remote.
    pub dry_run: bool,
}

impl Default for HierarchyOptions {
    fn default() -> Self {
        Self {
            use_existing_pages: true,
            labels: Vec::new(),
            dry_run: false,
        }
    }
}

/// Publishes a [`DocumentNode`] tree, parent strictly before children.
///
/// Children receive the parent's resolved page id (or a per-node category
/// override). A failed non-root node does not halt its siblings; a failed
/// root halts the walk, since no child can attach. The page-id cache is
/// persisted exactly once, at the end of the walk.
pub struct HierarchyPublisher<'a, C: ContentApi> {
    api: &'a C,
    publisher: PagePublisher<'a, C>,
    space_key: String,
    options: HierarchyOptions,
}

impl<'a, C: ContentApi> HierarchyPublisher<'a, C> {
    /// Create a hierarchy publisher targeting a default space.
    #[must_use]
    pub fn new(api: &'a C, space_key: impl Into<String>, options: HierarchyOptions) -> Self {
        let space_key = space_key.into();
        Self {
            api,
            publisher: PagePublisher::new(api, space_key.clone()),
            space_key,
            options,
        }
    }

    /// Set the server base URL used to build page URLs in reports.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.publisher = self.publisher.with_base_url(base_url);
        self
    }

    /// Walk the tree breadth-first and reconcile every node.
    ///
    /// Returns one report per visited node, in walk order.
    pub fn publish_tree(&self, root: &DocumentNode, cache: &mut PageIdCache) -> Vec<PublishReport> {
        let mut results = Vec::new();
        let mut queue: VecDeque<(&DocumentNode, Option<String>, bool)> = VecDeque::new();
        queue.push_back((root, None, true));

        while let Some((node, inherited, is_root)) = queue.pop_front() {
            let parent_id = node.parent_override.clone().or(inherited);
            let (report, resolved) = self.reconcile_node(node, parent_id, cache);

            let root_failed =
                is_root && !node.excluded && report.action == PublishAction::Error;
            results.push(report);
            if root_failed {
                error!("root page failed; halting hierarchy walk");
                break;
            }

            for child in &node.children {
                queue.push_back((child, resolved.clone(), false));
            }
        }

        if !self.options.dry_run
            && let Err(e) = cache.save()
        {
            error!("failed to save page-id cache: {e}");
        }

        results
    }

    /// Reconcile one node, returning its report and the page id its
    /// children should attach under.
    fn reconcile_node(
        &self,
        node: &DocumentNode,
        parent_id: Option<String>,
        cache: &mut PageIdCache,
    ) -> (PublishReport, Option<String>) {
        if node.excluded {
            return self.skip_excluded(node, cache);
        }

        let Some(source) = &node.source else {
            return (
                PublishReport::error(&node.title, "no content source for page"),
                None,
            );
        };
        let raw = match fs::read_to_string(source) {
            Ok(raw) => raw,
            Err(e) => {
                return (
                    PublishReport::error(
                        &node.title,
                        format!("cannot read {}: {e}", source.display()),
                    ),
                    None,
                );
            }
        };
        let (_, body) = parse_front_matter(&raw);

        let mut labels = self.options.labels.clone();
        labels.extend(node.labels.iter().cloned());
        let request = PublishRequest {
            title: node.title.clone(),
            content: body.to_owned(),
            space: node.space.clone(),
            parent_id,
            labels,
        };

        let outcome = if self.options.dry_run {
            self.publisher.dry_run(&request, cache)
        } else {
            self.publisher.publish(&request, cache)
        };

        match outcome {
            Ok(report) => {
                let resolved = report.page_id.clone();
                (report, resolved)
            }
            Err(e) => {
                error!("failed to publish '{}': {e}", node.title);
                (PublishReport::error(&node.title, e.to_string()), None)
            }
        }
    }

    /// Handle an excluded node: report it skipped and, when configured,
    /// resolve the existing remote page so children can attach under it.
    fn skip_excluded(
        &self,
        node: &DocumentNode,
        cache: &mut PageIdCache,
    ) -> (PublishReport, Option<String>) {
        info!("skipping '{}' (excluded by configuration)", node.title);
        let mut report = PublishReport::skipped(&node.title, REASON_EXCLUDED);

        // Only nodes with children need a resolved id
        if !self.options.use_existing_pages || node.children.is_empty() {
            return (report, None);
        }

        let space_key = node.space.as_deref().unwrap_or(&self.space_key);
        match locate(self.api, cache, space_key, &node.title, None) {
            Ok(Located::Found(page)) => {
                info!("using existing page {} for excluded '{}'", page.id, node.title);
                report.page_id = Some(page.id.clone());
                report.version = Some(page.version.number);
                let resolved = page.id.clone();
                (report, Some(resolved))
            }
            Ok(Located::NotFound) => {
                warn!(
                    "no existing page for excluded '{}'; its children will be orphaned",
                    node.title
                );
                (
                    PublishReport::error(
                        &node.title,
                        "no existing page found and creation is disabled",
                    ),
                    None,
                )
            }
            Err(e) => {
                warn!("lookup for excluded '{}' failed: {e}", node.title);
                (report, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryRemote;
    use pretty_assertions::assert_eq;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn cache(tmp: &TempDir) -> PageIdCache {
        PageIdCache::load(tmp.path().join("cache.json"))
    }

    fn doc(tmp: &Path, name: &str, content: &str) -> PathBuf {
        let path = tmp.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Root -> {Operations -> {Runbook}, Guides}
    fn sample_tree(tmp: &Path) -> DocumentNode {
        let mut root = DocumentNode::new("Automation Hub", doc(tmp, "hub.md", "<p>hub</p>"));
        let mut ops = DocumentNode::new("Operations", doc(tmp, "ops.md", "<p>ops</p>"));
        ops.children.push(DocumentNode::new(
            "Runbook",
            doc(tmp, "runbook.md", "<p>rb</p>"),
        ));
        root.children.push(ops);
        root.children
            .push(DocumentNode::new("Guides", doc(tmp, "guides.md", "<p>g</p>")));
        root
    }

    fn publisher(remote: &InMemoryRemote) -> HierarchyPublisher<'_, InMemoryRemote> {
        HierarchyPublisher::new(remote, "DOCS", HierarchyOptions::default())
    }

    #[test]
    fn test_parent_published_before_children_with_resolved_ids() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        let mut cache = cache(&tmp);

        let root = sample_tree(tmp.path());
        let results = publisher(&remote).publish_tree(&root, &mut cache);

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.action == PublishAction::Created));

        // Every child's remote parent is its parent node's resolved id
        let by_title = |title: &str| {
            results
                .iter()
                .find(|r| r.title == title)
                .and_then(|r| r.page_id.clone())
                .unwrap()
        };
        assert_eq!(remote.parent_of(&by_title("Operations")), Some(by_title("Automation Hub")));
        assert_eq!(remote.parent_of(&by_title("Guides")), Some(by_title("Automation Hub")));
        assert_eq!(remote.parent_of(&by_title("Runbook")), Some(by_title("Operations")));

        // No child create precedes its parent's create
        let calls = remote.calls();
        let pos = |needle: &str| calls.iter().position(|c| c == needle).unwrap();
        assert!(pos("create:Automation Hub") < pos("create:Operations"));
        assert!(pos("create:Operations") < pos("create:Runbook"));
    }

    #[test]
    fn test_walk_order_is_breadth_first() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        let mut cache = cache(&tmp);

        let root = sample_tree(tmp.path());
        let results = publisher(&remote).publish_tree(&root, &mut cache);

        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Automation Hub", "Operations", "Guides", "Runbook"]
        );
    }

    #[test]
    fn test_excluded_root_resolves_existing_page_for_children() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        let existing = remote.seed_page("DOCS", "Automation Hub", "<p>hub</p>", None);
        let mut cache = cache(&tmp);

        let mut root = sample_tree(tmp.path());
        root.excluded = true;

        let results = publisher(&remote).publish_tree(&root, &mut cache);

        assert_eq!(results[0].action, PublishAction::Skipped);
        assert_eq!(results[0].reason.as_deref(), Some(REASON_EXCLUDED));
        assert_eq!(results[0].page_id.as_deref(), Some(existing.as_str()));

        // Children attach under the existing page
        let ops_id = results
            .iter()
            .find(|r| r.title == "Operations")
            .and_then(|r| r.page_id.clone())
            .unwrap();
        assert_eq!(remote.parent_of(&ops_id), Some(existing));
    }

    #[test]
    fn test_excluded_root_without_existing_page_orphans_children() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        let mut cache = cache(&tmp);

        let mut root = sample_tree(tmp.path());
        root.excluded = true;

        let results = publisher(&remote).publish_tree(&root, &mut cache);

        // Root lookup fails but the walk continues
        assert_eq!(results[0].action, PublishAction::Error);
        assert_eq!(results.len(), 4);

        let ops_id = results
            .iter()
            .find(|r| r.title == "Operations")
            .and_then(|r| r.page_id.clone())
            .unwrap();
        assert_eq!(remote.parent_of(&ops_id), None);
    }

    #[test]
    fn test_excluded_leaf_is_reported_without_lookup() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        let mut cache = cache(&tmp);

        let mut root = sample_tree(tmp.path());
        root.children[1].excluded = true; // "Guides", a leaf

        let results = publisher(&remote).publish_tree(&root, &mut cache);

        let guides = results.iter().find(|r| r.title == "Guides").unwrap();
        assert_eq!(guides.action, PublishAction::Skipped);
        assert!(guides.page_id.is_none());
        assert!(remote.calls().iter().all(|c| !c.contains("Guides")));
    }

    #[test]
    fn test_root_failure_halts_walk() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        remote.fail_create_for("Automation Hub");
        let mut cache = cache(&tmp);

        let root = sample_tree(tmp.path());
        let results = publisher(&remote).publish_tree(&root, &mut cache);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].action, PublishAction::Error);
        assert!(remote.calls().iter().all(|c| !c.contains("Operations")));
    }

    #[test]
    fn test_non_root_failure_continues_siblings() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        remote.fail_create_for("Operations");
        let mut cache = cache(&tmp);

        let root = sample_tree(tmp.path());
        let results = publisher(&remote).publish_tree(&root, &mut cache);

        assert_eq!(results.len(), 4);
        let ops = results.iter().find(|r| r.title == "Operations").unwrap();
        assert_eq!(ops.action, PublishAction::Error);

        // Sibling still publishes
        let guides = results.iter().find(|r| r.title == "Guides").unwrap();
        assert_eq!(guides.action, PublishAction::Created);

        // The failed node's child publishes without a parent
        let runbook = results.iter().find(|r| r.title == "Runbook").unwrap();
        assert_eq!(runbook.action, PublishAction::Created);
        assert_eq!(remote.parent_of(runbook.page_id.as_deref().unwrap()), None);
    }

    #[test]
    fn test_unreadable_content_file_is_per_node_error() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        let mut cache = cache(&tmp);

        let mut root = sample_tree(tmp.path());
        root.children[1].source = Some(tmp.path().join("missing.md"));

        let results = publisher(&remote).publish_tree(&root, &mut cache);

        let guides = results.iter().find(|r| r.title == "Guides").unwrap();
        assert_eq!(guides.action, PublishAction::Error);
        assert!(guides.error.as_deref().unwrap().contains("missing.md"));
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_front_matter_is_stripped_from_published_content() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        let mut cache = cache(&tmp);

        let root = DocumentNode::new(
            "Hub",
            doc(
                tmp.path(),
                "hub.md",
                "---\nconfluence:\n  labels: [x]\n---\n<p>body only</p>\n",
            ),
        );
        let results = publisher(&remote).publish_tree(&root, &mut cache);

        let id = results[0].page_id.as_deref().unwrap().to_owned();
        let page = remote.get_page(&id, &["body.storage"]).unwrap();
        assert_eq!(page.body_storage(), "<p>body only</p>\n");
    }

    #[test]
    fn test_parent_override_takes_precedence() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        let anchor = remote.seed_page("DOCS", "Anchor", "<p>a</p>", None);
        let mut cache = cache(&tmp);

        let mut root = sample_tree(tmp.path());
        root.children[1].parent_override = Some(anchor.clone());

        let results = publisher(&remote).publish_tree(&root, &mut cache);
        let guides_id = results
            .iter()
            .find(|r| r.title == "Guides")
            .and_then(|r| r.page_id.clone())
            .unwrap();
        assert_eq!(remote.parent_of(&guides_id), Some(anchor));
    }

    #[test]
    fn test_cache_persisted_once_at_end_of_walk() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        let cache_path = tmp.path().join("cache.json");
        let mut cache = PageIdCache::load(cache_path.clone());

        let root = sample_tree(tmp.path());
        publisher(&remote).publish_tree(&root, &mut cache);

        let reloaded = PageIdCache::load(cache_path);
        assert_eq!(reloaded.len(), 4);
        assert!(reloaded.get("DOCS", "Runbook").is_some());
    }

    #[test]
    fn test_dry_run_mutates_nothing_and_saves_no_cache() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        let cache_path = tmp.path().join("cache.json");
        let mut cache = PageIdCache::load(cache_path.clone());

        let root = sample_tree(tmp.path());
        let options = HierarchyOptions {
            dry_run: true,
            ..HierarchyOptions::default()
        };
        let results =
            HierarchyPublisher::new(&remote, "DOCS", options).publish_tree(&root, &mut cache);

        assert!(results.iter().all(|r| r.dry_run));
        assert!(
            remote
                .calls()
                .iter()
                .all(|c| !c.starts_with("create:") && !c.starts_with("update:"))
        );
        assert!(!cache_path.exists());
    }

    #[test]
    fn test_labels_merge_options_then_node() {
        let tmp = TempDir::new().unwrap();
        let remote = InMemoryRemote::new();
        let mut cache = cache(&tmp);

        let mut root = DocumentNode::new("Hub", doc(tmp.path(), "hub.md", "<p>h</p>"));
        root.labels = vec!["oncall".to_owned()];

        let options = HierarchyOptions {
            labels: vec!["automation".to_owned()],
            ..HierarchyOptions::default()
        };
        let results =
            HierarchyPublisher::new(&remote, "DOCS", options).publish_tree(&root, &mut cache);

        let id = results[0].page_id.as_deref().unwrap().to_owned();
        let page = remote.get_page(&id, &["metadata.labels"]).unwrap();
        let labels: Vec<_> = page
            .metadata
            .unwrap()
            .labels
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(labels, vec!["automation".to_owned(), "oncall".to_owned()]);
    }
}
