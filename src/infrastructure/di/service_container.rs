//! Service container for dependency injection
//!
//! Wires settings and the filesystem into the loader and the tree view.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::TreeView;
use crate::config::Settings;
use crate::domain::Tree;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::loader::TreeLoader;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    pub fn loader(&self) -> TreeLoader {
        TreeLoader::new(Arc::clone(&self.fs))
    }

    /// Initial tree: explicit seed, else the configured seed file, else the
    /// built-in demo tree.
    pub fn load_tree(&self, seed: Option<&Path>) -> InfraResult<Tree> {
        match seed.or(self.settings.seed_file.as_deref()) {
            Some(path) => self.loader().load_tree(path),
            None => {
                debug!("no seed given, using demo tree");
                Ok(Tree::demo())
            }
        }
    }

    /// Mount a tree view over the initial tree.
    pub fn mount_view<E>(&self, seed: Option<&Path>) -> InfraResult<TreeView<E>> {
        let tree = self.load_tree(seed)?;
        Ok(TreeView::mount(tree, self.settings.expand_delay()))
    }
}
