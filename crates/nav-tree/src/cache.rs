//! Persistent caching of linked trees.
//!
//! Provides [`TreeCache`] trait and implementations:
//! - [`FileTreeCache`]: one JSON file per self node under `{cache_dir}/navtree/`
//! - [`NullTreeCache`]: no-op cache (always returns `None`)
//!
//! Cache files carry a format version; files written by another version are
//! treated as misses.

use std::fs;
use std::path::PathBuf;

use nav_repo::ContentId;
use serde::{Deserialize, Serialize};

use crate::model::NavTree;

/// Bumped whenever the cached tree layout changes.
const CACHE_FORMAT_VERSION: u32 = 2;

/// Cache file format.
#[derive(Serialize, Deserialize)]
struct CachedTree {
    version: u32,
    tree: NavTree,
}

/// Trait for tree caching implementations.
pub trait TreeCache: Send + Sync {
    /// Retrieve the cached tree built for `self_id`.
    ///
    /// Returns `None` on cache miss or invalid cache.
    fn get(&self, self_id: ContentId) -> Option<NavTree>;

    /// Store a tree under its self id.
    fn set(&self, tree: &NavTree);

    /// Remove all cached trees.
    fn invalidate(&self);
}

/// No-op cache that never stores or retrieves data.
#[derive(Debug)]
pub struct NullTreeCache;

impl TreeCache for NullTreeCache {
    fn get(&self, _self_id: ContentId) -> Option<NavTree> {
        None
    }

    fn set(&self, _tree: &NavTree) {}

    fn invalidate(&self) {}
}

/// File-based tree cache.
///
/// Stores each tree as JSON in `{cache_dir}/navtree/{self_id}.json`.
#[derive(Debug)]
pub struct FileTreeCache {
    dir: PathBuf,
}

impl FileTreeCache {
    /// Create a cache storing files below `cache_dir`.
    #[must_use]
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            dir: cache_dir.join("navtree"),
        }
    }

    fn tree_path(&self, self_id: ContentId) -> PathBuf {
        self.dir.join(format!("{self_id}.json"))
    }
}

impl TreeCache for FileTreeCache {
    fn get(&self, self_id: ContentId) -> Option<NavTree> {
        let path = self.tree_path(self_id);
        if !path.exists() {
            return None;
        }

        let content = fs::read_to_string(&path).ok()?;
        let cached: CachedTree = match serde_json::from_str(&content) {
            Ok(cached) => cached,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Ignoring unreadable tree cache");
                return None;
            }
        };
        if cached.version != CACHE_FORMAT_VERSION || cached.tree.self_id != self_id {
            tracing::debug!(path = %path.display(), "Ignoring stale tree cache");
            return None;
        }
        Some(cached.tree)
    }

    fn set(&self, tree: &NavTree) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            tracing::debug!(error = %e, "Failed to create tree cache directory");
            return;
        }

        let cached = CachedTree {
            version: CACHE_FORMAT_VERSION,
            tree: tree.clone(),
        };
        let content = match serde_json::to_string(&cached) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to serialize tree");
                return;
            }
        };

        if let Err(e) = fs::write(self.tree_path(tree.self_id), content) {
            tracing::debug!(error = %e, "Failed to write tree cache");
        }
    }

    fn invalidate(&self) {
        if self.dir.exists()
            && let Err(e) = fs::remove_dir_all(&self.dir)
        {
            tracing::debug!(error = %e, "Failed to remove tree cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use nav_repo::StandardParams;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::classify::NodeType;
    use crate::model::NavNode;

    fn create_test_tree(self_id: u64) -> NavTree {
        NavTree {
            root: NavNode {
                id: ContentId(self_id),
                revision: 3,
                name: "Home".to_owned(),
                content_type_id: 311,
                relative_level: 0,
                absolute_level: 0,
                node_type: NodeType::SelfNode,
                landing_page: None,
                info_url: Some("/render".to_owned()),
                images: Vec::new(),
                children: Vec::new(),
            },
            self_id: ContentId(self_id),
            theme: Some("blue".to_owned()),
            variable_selector: None,
            image_selector: None,
            params: StandardParams::default(),
        }
    }

    #[test]
    fn test_null_cache_set_is_noop() {
        let cache = NullTreeCache;
        cache.set(&create_test_tree(1));
        assert!(cache.get(ContentId(1)).is_none());
    }

    #[test]
    fn test_file_cache_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileTreeCache::new(dir.path().to_path_buf());

        assert!(cache.get(ContentId(1)).is_none());
    }

    #[test]
    fn test_file_cache_stores_per_self_id() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileTreeCache::new(dir.path().to_path_buf());
        let tree = create_test_tree(1);

        cache.set(&tree);

        assert!(dir.path().join("navtree/1.json").exists());
        assert_eq!(cache.get(ContentId(1)), Some(tree));
        assert!(cache.get(ContentId(2)).is_none());
    }

    #[test]
    fn test_file_cache_invalidate() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileTreeCache::new(dir.path().to_path_buf());
        cache.set(&create_test_tree(1));
        cache.set(&create_test_tree(2));

        cache.invalidate();

        assert!(cache.get(ContentId(1)).is_none());
        assert!(cache.get(ContentId(2)).is_none());
    }

    #[test]
    fn test_file_cache_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileTreeCache::new(dir.path().to_path_buf());
        fs::create_dir_all(dir.path().join("navtree")).unwrap();
        fs::write(dir.path().join("navtree/1.json"), "not json").unwrap();

        assert!(cache.get(ContentId(1)).is_none());
    }

    #[test]
    fn test_file_cache_ignores_other_version() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileTreeCache::new(dir.path().to_path_buf());
        let stale = serde_json::json!({
            "version": CACHE_FORMAT_VERSION + 1,
            "tree": create_test_tree(1),
        });
        fs::create_dir_all(dir.path().join("navtree")).unwrap();
        fs::write(dir.path().join("navtree/1.json"), stale.to_string()).unwrap();

        assert!(cache.get(ContentId(1)).is_none());
    }
}
