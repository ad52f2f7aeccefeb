//! In-memory [`ContentApi`] double for tests.
//!
//! Models the slice of Confluence the publish workflow observes: pages
//! with ids, versions, bodies, ancestors, and metadata; title uniqueness
//! within a space; optimistic-concurrency version checks on update. Every
//! remote call is appended to a call log so tests can assert on call
//! counts and ordering. Failure injection flags simulate transport and
//! server errors.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::api::ContentApi;
use crate::error::ConfluenceError;
use crate::types::{
    Ancestor, Body, CreatePage, Links, Metadata, Page, PropertyValue, Storage, UpdatePage, Version,
};

#[derive(Clone)]
struct StoredPage {
    id: String,
    space: String,
    title: String,
    version: u32,
    body: String,
    parent: Option<String>,
    properties: BTreeMap<String, String>,
    labels: Vec<String>,
}

#[derive(Default)]
struct State {
    pages: BTreeMap<String, StoredPage>,
    next_id: u64,
    calls: Vec<String>,
    fail_get: bool,
    fail_find: bool,
    fail_create: bool,
    fail_update: bool,
    fail_create_title: Option<String>,
}

/// In-memory remote content service.
pub(crate) struct InMemoryRemote {
    state: RefCell<State>,
}

impl InMemoryRemote {
    pub(crate) fn new() -> Self {
        Self {
            state: RefCell::new(State {
                next_id: 100_000,
                ..State::default()
            }),
        }
    }

    /// Seed a page directly into the remote, bypassing the call log.
    /// Returns the new page id.
    pub(crate) fn seed_page(
        &self,
        space: &str,
        title: &str,
        body: &str,
        parent: Option<&str>,
    ) -> String {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id.to_string();
        state.pages.insert(
            id.clone(),
            StoredPage {
                id: id.clone(),
                space: space.to_owned(),
                title: title.to_owned(),
                version: 1,
                body: body.to_owned(),
                parent: parent.map(str::to_owned),
                properties: BTreeMap::new(),
                labels: Vec::new(),
            },
        );
        id
    }

    /// Remove a page, simulating remote deletion.
    pub(crate) fn remove_page(&self, page_id: &str) {
        self.state.borrow_mut().pages.remove(page_id);
    }

    /// Current version of a stored page.
    pub(crate) fn version_of(&self, page_id: &str) -> Option<u32> {
        self.state.borrow().pages.get(page_id).map(|p| p.version)
    }

    /// Direct parent id of a stored page.
    pub(crate) fn parent_of(&self, page_id: &str) -> Option<String> {
        self.state
            .borrow()
            .pages
            .get(page_id)
            .and_then(|p| p.parent.clone())
    }

    /// Stored metadata property of a page.
    pub(crate) fn property_of(&self, page_id: &str, key: &str) -> Option<String> {
        self.state
            .borrow()
            .pages
            .get(page_id)
            .and_then(|p| p.properties.get(key).cloned())
    }

    /// The call log so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn fail_get(&self, fail: bool) {
        self.state.borrow_mut().fail_get = fail;
    }

    pub(crate) fn fail_find(&self, fail: bool) {
        self.state.borrow_mut().fail_find = fail;
    }

    pub(crate) fn fail_create(&self, fail: bool) {
        self.state.borrow_mut().fail_create = fail;
    }

    pub(crate) fn fail_update(&self, fail: bool) {
        self.state.borrow_mut().fail_update = fail;
    }

    /// Fail create calls for one specific title only.
    pub(crate) fn fail_create_for(&self, title: &str) {
        self.state.borrow_mut().fail_create_title = Some(title.to_owned());
    }

    fn server_error() -> ConfluenceError {
        ConfluenceError::HttpResponse {
            status: 500,
            body: "injected failure".to_owned(),
        }
    }

    fn to_page(stored: &StoredPage) -> Page {
        Page {
            id: stored.id.clone(),
            content_type: "page".to_owned(),
            title: stored.title.clone(),
            version: Version {
                number: stored.version,
                message: None,
                when: None,
            },
            space: Some(crate::types::Space {
                key: stored.space.clone(),
            }),
            body: Some(Body {
                storage: Some(Storage::new(stored.body.clone())),
            }),
            ancestors: stored
                .parent
                .iter()
                .map(|id| Ancestor { id: id.clone() })
                .collect(),
            metadata: Some(Metadata {
                properties: stored
                    .properties
                    .iter()
                    .map(|(k, v)| (k.clone(), PropertyValue::new(v.clone())))
                    .collect(),
                labels: stored
                    .labels
                    .iter()
                    .map(|name| crate::types::Label { name: name.clone() })
                    .collect(),
            }),
            links: Some(Links {
                webui: Some(format!(
                    "/display/{}/{}",
                    stored.space,
                    stored.title.replace(' ', "+")
                )),
                self_link: None,
            }),
        }
    }
}

impl ContentApi for InMemoryRemote {
    fn get_page(&self, page_id: &str, _expand: &[&str]) -> Result<Page, ConfluenceError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("get:{page_id}"));
        if state.fail_get {
            return Err(Self::server_error());
        }
        state
            .pages
            .get(page_id)
            .map(Self::to_page)
            .ok_or_else(|| ConfluenceError::NotFound(page_id.to_owned()))
    }

    fn find_pages(
        &self,
        space_key: &str,
        title: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<Page>, ConfluenceError> {
        let mut state = self.state.borrow_mut();
        let call = match parent_id {
            Some(parent) => format!("find:{space_key}:{title}:parent={parent}"),
            None => format!("find:{space_key}:{title}"),
        };
        state.calls.push(call);
        if state.fail_find {
            return Err(Self::server_error());
        }
        Ok(state
            .pages
            .values()
            .filter(|p| {
                p.space == space_key
                    && p.title == title
                    && parent_id.is_none_or(|parent| p.parent.as_deref() == Some(parent))
            })
            .map(Self::to_page)
            .collect())
    }

    fn create_page(&self, request: &CreatePage) -> Result<Page, ConfluenceError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("create:{}", request.title));
        if state.fail_create || state.fail_create_title.as_deref() == Some(&request.title) {
            return Err(Self::server_error());
        }
        if state
            .pages
            .values()
            .any(|p| p.space == request.space.key && p.title == request.title)
        {
            return Err(ConfluenceError::HttpResponse {
                status: 400,
                body: format!("page '{}' already exists in space", request.title),
            });
        }

        state.next_id += 1;
        let id = state.next_id.to_string();
        let stored = StoredPage {
            id: id.clone(),
            space: request.space.key.clone(),
            title: request.title.clone(),
            version: 1,
            body: request
                .body
                .storage
                .as_ref()
                .map(|s| s.value.clone())
                .unwrap_or_default(),
            parent: request.ancestors.first().map(|a| a.id.clone()),
            properties: request
                .metadata
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), v.value.clone()))
                .collect(),
            labels: request
                .metadata
                .labels
                .iter()
                .map(|l| l.name.clone())
                .collect(),
        };
        let page = Self::to_page(&stored);
        state.pages.insert(id, stored);
        Ok(page)
    }

    fn update_page(&self, page_id: &str, request: &UpdatePage) -> Result<Page, ConfluenceError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("update:{page_id}"));
        if state.fail_update {
            return Err(Self::server_error());
        }
        let Some(stored) = state.pages.get_mut(page_id) else {
            return Err(ConfluenceError::NotFound(page_id.to_owned()));
        };

        // Optimistic concurrency: the payload version must advance by 1
        if request.version.number != stored.version + 1 {
            return Err(ConfluenceError::HttpResponse {
                status: 409,
                body: format!(
                    "version conflict: expected {}, got {}",
                    stored.version + 1,
                    request.version.number
                ),
            });
        }

        stored.version = request.version.number;
        stored.title = request.title.clone();
        stored.body = request
            .body
            .storage
            .as_ref()
            .map(|s| s.value.clone())
            .unwrap_or_default();
        stored.properties = request
            .metadata
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect();
        stored.labels = request.metadata.labels.iter().map(|l| l.name.clone()).collect();

        Ok(Self::to_page(stored))
    }
}
