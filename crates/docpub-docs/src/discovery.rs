//! Recursive section discovery over a docs directory.
//!
//! Each directory is a section. Its main document is the first of
//! `<dirname>.md`, `index.md`, `main.md`; sibling `.md` files are child
//! documents and subdirectories nest recursively. `README.md` files are
//! repository-facing and never published. A section without a main
//! document cannot anchor children of its own, so its documents are
//! hoisted into the enclosing section.
//!
//! Discovery reads each file's front matter to pick up title, label,
//! category, and exclusion overrides; files that cannot be read are still
//! included so the publish walk can report them individually.

use std::fs;
use std::path::{Path, PathBuf};

use docpub_config::{HierarchyConfig, PublishingConfig};

use crate::frontmatter::{ConfluenceMeta, parse_front_matter};
use crate::hierarchy::resolve_parent;
use crate::node::DocumentNode;
use crate::DocsError;

/// Main-document candidates for a section directory, in priority order.
fn main_doc_candidates(dir_name: &str) -> [String; 3] {
    [
        format!("{dir_name}.md"),
        "index.md".to_owned(),
        "main.md".to_owned(),
    ]
}

/// A discovered section directory, before tree construction.
#[derive(Debug, Default)]
pub struct DiscoveredSection {
    /// Directory name.
    pub name: String,
    /// Main document, if the directory has one.
    pub main_doc: Option<PathBuf>,
    /// Child documents as `(stem, path)` pairs, sorted by name.
    pub children: Vec<(String, PathBuf)>,
    /// Nested subsections, sorted by name.
    pub nested: Vec<DiscoveredSection>,
}

impl DiscoveredSection {
    /// Whether the section holds no documents at any depth.
    fn is_empty(&self) -> bool {
        self.main_doc.is_none()
            && self.children.is_empty()
            && self.nested.iter().all(DiscoveredSection::is_empty)
    }
}

/// Analyze one directory into a [`DiscoveredSection`].
fn analyze_section(dir: &Path) -> Result<DiscoveredSection, DocsError> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_owned();

    let mut section = DiscoveredSection {
        name: name.clone(),
        ..DiscoveredSection::default()
    };

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .collect();
    entries.sort();

    let candidates = main_doc_candidates(&name);
    for candidate in &candidates {
        let path = dir.join(candidate);
        if path.is_file() {
            section.main_doc = Some(path);
            break;
        }
    }

    for path in entries {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_owned();
        if file_name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            let nested = analyze_section(&path)?;
            if !nested.is_empty() {
                section.nested.push(nested);
            }
        } else if path.extension().is_some_and(|ext| ext == "md")
            && file_name != "README.md"
            && Some(&path) != section.main_doc.as_ref()
        {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_owned();
            section.children.push((stem, path));
        }
    }

    Ok(section)
}

/// Discover the publish tree for a docs directory.
///
/// The returned root node carries the configured root title and the
/// directory's own main document (if any). A root without a main document
/// is marked excluded so the publisher resolves it to an existing remote
/// page instead of creating one, as is a root skipped by configuration.
///
/// # Errors
///
/// Returns [`DocsError::SourceMissing`] if `source_dir` does not exist,
/// or [`DocsError::Io`] if the walk fails.
pub fn discover_tree(
    source_dir: &Path,
    publishing: &PublishingConfig,
    hierarchy: &HierarchyConfig,
) -> Result<DocumentNode, DocsError> {
    if !source_dir.is_dir() {
        return Err(DocsError::SourceMissing(
            source_dir.display().to_string(),
        ));
    }

    let section = analyze_section(source_dir)?;

    let mut root = match &section.main_doc {
        Some(path) => node_from_file(path, &publishing.root_title, publishing, hierarchy),
        None => {
            tracing::info!(
                "no root document in {}; root page will not be created",
                source_dir.display()
            );
            DocumentNode {
                title: publishing.root_title.clone(),
                excluded: true,
                ..DocumentNode::default()
            }
        }
    };
    root.title = publishing.root_title.clone();
    root.excluded =
        root.excluded || publishing.skip_root_page || root.source.is_none();

    root.children = section_children(&section, publishing, hierarchy);

    tracing::info!("discovered {} documents", root.count());
    Ok(root)
}

/// Build the child nodes of a section: its documents, then its nested
/// sections (sections without a main document are flattened into this
/// level).
fn section_children(
    section: &DiscoveredSection,
    publishing: &PublishingConfig,
    hierarchy: &HierarchyConfig,
) -> Vec<DocumentNode> {
    let mut nodes = Vec::new();

    for (stem, path) in &section.children {
        let title = title_from_stem(stem);
        nodes.push(node_from_file(path, &title, publishing, hierarchy));
    }

    for nested in &section.nested {
        let children = section_children(nested, publishing, hierarchy);
        match &nested.main_doc {
            Some(path) => {
                let title = title_from_stem(&nested.name);
                let mut node = node_from_file(path, &title, publishing, hierarchy);
                node.children = children;
                nodes.push(node);
            }
            None => nodes.extend(children),
        }
    }

    nodes
}

/// Build a node for one document, applying front matter overrides.
fn node_from_file(
    path: &Path,
    derived_title: &str,
    publishing: &PublishingConfig,
    hierarchy: &HierarchyConfig,
) -> DocumentNode {
    let meta = read_meta(path);

    let title = meta
        .as_ref()
        .and_then(|m| m.title.clone())
        .unwrap_or_else(|| derived_title.to_owned());
    let excluded = meta.as_ref().is_some_and(|m| m.exclude)
        || publishing.excluded_titles.contains(&title);
    let parent_override = meta
        .as_ref()
        .and_then(|m| m.category.as_deref())
        .and_then(|category| resolve_parent(hierarchy, category));

    DocumentNode {
        title,
        source: Some(path.to_path_buf()),
        space: meta.as_ref().and_then(|m| m.space.clone()),
        labels: meta.map(|m| m.labels).unwrap_or_default(),
        excluded,
        parent_override,
        children: Vec::new(),
    }
}

/// Read a document's `confluence:` front matter table, if any.
fn read_meta(path: &Path) -> Option<ConfluenceMeta> {
    match fs::read_to_string(path) {
        Ok(content) => parse_front_matter(&content).0.confluence,
        Err(e) => {
            tracing::warn!("failed to read {} during discovery: {e}", path.display());
            None
        }
    }
}

/// Derive a page title from a file stem: underscores become spaces and
/// each word is title-cased (`incident_response` -> `Incident Response`).
#[must_use]
pub fn title_from_stem(stem: &str) -> String {
    stem.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
