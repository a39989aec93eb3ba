//! Request-facing navigation renderer.
//!
//! [`Navigator`] owns the collaborators, settings and tree caches and turns a
//! content id plus request into a rendered navigation document.
//!
//! # Thread Safety
//!
//! `Navigator` is designed for concurrent access:
//! - `tree()` returns `Arc<NavTree>`; cache hits only take a read lock
//! - first builds use double-checked locking so each tree is linked once
//! - `invalidate()` drops in-memory and persistent trees

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use nav_repo::{ContentId, ContentRepository, RequestContext, StandardParam, UrlBuilder};
use nav_xml::{XmlElement, XmlSerializer};

use crate::cache::{NullTreeCache, TreeCache};
use crate::compose::{LinkParams, compose, override_theme, relink};
use crate::error::NavError;
use crate::linker::TreeLinker;
use crate::model::NavTree;
use crate::settings::NavSettings;

/// Builds, caches and renders navigation trees.
pub struct Navigator {
    repo: Arc<dyn ContentRepository>,
    urls: Arc<dyn UrlBuilder>,
    settings: NavSettings,
    cache: Box<dyn TreeCache>,
    serializer: XmlSerializer,
    build_lock: Mutex<()>,
    trees: RwLock<HashMap<ContentId, Arc<NavTree>>>,
}

impl Navigator {
    /// Create a navigator without persistent cache.
    #[must_use]
    pub fn new(
        repo: Arc<dyn ContentRepository>,
        urls: Arc<dyn UrlBuilder>,
        settings: NavSettings,
    ) -> Self {
        Self {
            repo,
            urls,
            settings,
            cache: Box::new(NullTreeCache),
            serializer: XmlSerializer::new(),
            build_lock: Mutex::new(()),
            trees: RwLock::new(HashMap::new()),
        }
    }

    /// Use a persistent tree cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Box<dyn TreeCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Use a custom serializer for [`Navigator::render`].
    #[must_use]
    pub fn with_serializer(mut self, serializer: XmlSerializer) -> Self {
        self.serializer = serializer;
        self
    }

    /// Settings in use.
    #[must_use]
    pub fn settings(&self) -> &NavSettings {
        &self.settings
    }

    /// Get the tree for `id`, linking it on first use.
    ///
    /// Uses double-checked locking:
    /// 1. Fast path: return the in-memory tree
    /// 2. Slow path: acquire `build_lock`, recheck, then try the persistent
    ///    cache before linking
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if linking fails. Failed builds are not cached.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn tree(&self, id: ContentId, request: &RequestContext) -> Result<Arc<NavTree>, NavError> {
        // Fast path: already linked
        if let Some(tree) = self.trees.read().unwrap().get(&id) {
            return Ok(Arc::clone(tree));
        }

        // Slow path: acquire build lock
        let _guard = self.build_lock.lock().unwrap();

        // Double-check after acquiring lock
        if let Some(tree) = self.trees.read().unwrap().get(&id) {
            return Ok(Arc::clone(tree));
        }

        let tree = match self.cache.get(id) {
            Some(tree) => {
                tracing::debug!(content_id = %id, "Navigation tree loaded from cache");
                Arc::new(tree)
            }
            None => {
                let tree = TreeLinker::new(self.repo.as_ref(), &self.settings).link(id, request)?;
                self.cache.set(&tree);
                Arc::new(tree)
            }
        };

        self.trees.write().unwrap().insert(id, Arc::clone(&tree));
        Ok(tree)
    }

    /// Build the render-ready document for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if the tree cannot be linked or a link cannot be
    /// rebuilt.
    pub fn document(&self, id: ContentId, request: &RequestContext) -> Result<XmlElement, NavError> {
        let tree = self.tree(id, request)?;
        let document = compose(&tree, request, &self.settings);
        let document = override_theme(
            &document,
            request.param(&self.settings.theme_param),
            self.repo.as_ref(),
            request.param(StandardParam::SiteId.as_str()),
        );
        let params = LinkParams::from_request(request, &self.settings);
        relink(&document, &params, self.repo.as_ref(), self.urls.as_ref())
    }

    /// Render the navigation document for `id` as XML text.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if the tree cannot be linked or a link cannot be
    /// rebuilt.
    pub fn render(&self, id: ContentId, request: &RequestContext) -> Result<String, NavError> {
        let document = self.document(id, request)?;
        Ok(self.serializer.serialize(&document))
    }

    /// Drop all cached trees.
    ///
    /// Callers holding an `Arc<NavTree>` keep using it.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn invalidate(&self) {
        self.trees.write().unwrap().clear();
        self.cache.invalidate();
    }
}
