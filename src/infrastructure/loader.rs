//! Seed trees and action scripts from TOML files.
//!
//! Seed file:
//! ```toml
//! [[items]]
//! id = "1"
//! label = "Inbox"
//! color = "blue"
//!
//! [[items.children]]
//! id = "1.1"
//! label = "Today"
//! ```
//!
//! Script file, one `[[action]]` per dispatch:
//! ```toml
//! [[action]]
//! type = "instruction"
//! item_id = "3"
//! target_id = "1"
//! instruction = { type = "make-child", current_level = 0 }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::TreeAction;
use crate::domain::Tree;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::FileSystem;

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default, rename = "action")]
    actions: Vec<TreeAction>,
}

/// Parse a seed tree. Ids must be unique; leaves are normalized to closed.
pub fn parse_tree(path: &Path, content: &str) -> InfraResult<Tree> {
    let tree: Tree = toml::from_str(content).map_err(|e| InfraError::parse(path, e))?;
    tree.check_unique_ids()?;
    Ok(tree.normalized())
}

pub fn parse_script(path: &Path, content: &str) -> InfraResult<Vec<TreeAction>> {
    let script: Script = toml::from_str(content).map_err(|e| InfraError::parse(path, e))?;
    Ok(script.actions)
}

/// Reads seeds and scripts through the injected filesystem.
pub struct TreeLoader {
    fs: Arc<dyn FileSystem>,
}

impl TreeLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn read(&self, path: &Path) -> InfraResult<String> {
        self.fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load_tree(&self, path: &Path) -> InfraResult<Tree> {
        let tree = parse_tree(path, &self.read(path)?)?;
        debug!(items = tree.len(), depth = tree.depth(), "seed loaded");
        Ok(tree)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load_script(&self, path: &Path) -> InfraResult<Vec<TreeAction>> {
        let actions = parse_script(path, &self.read(path)?)?;
        debug!(actions = actions.len(), "script loaded");
        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::domain::{DomainError, ItemId};

    #[test]
    fn given_duplicate_ids_when_parsing_seed_then_rejects() {
        let content = r#"
[[items]]
id = "a"
label = "A"

[[items]]
id = "a"
label = "again"
"#;

        let result = parse_tree(Path::new("seed.toml"), content);

        assert!(matches!(
            result,
            Err(InfraError::Application(ApplicationError::Domain(DomainError::DuplicateId(id))))
                if id == ItemId::from("a")
        ));
    }

    #[test]
    fn given_open_leaf_in_seed_when_parsing_then_is_closed() {
        let content = r#"
[[items]]
id = "a"
label = "A"
is_open = true
"#;

        let tree = parse_tree(Path::new("seed.toml"), content).unwrap();

        assert!(!tree.items()[0].is_open);
    }

    #[test]
    fn given_empty_script_when_parsing_then_no_actions() {
        let actions = parse_script(Path::new("script.toml"), "").unwrap();
        assert!(actions.is_empty());
    }
}
