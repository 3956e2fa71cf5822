//! Derived queries over a committed tree.
//!
//! A [`Snapshot`] pairs one committed tree with a lazily built index. The
//! index lives and dies with the snapshot, so a query can never answer from
//! a tree that has since been replaced.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{instrument, warn};

use crate::domain::{
    is_legal_parent, DomainError, Instruction, ItemId, Parent, Tree, TreeItem, TreeResult,
};

/// Label of the root entry in parent pickers.
pub const NO_PARENT_LABEL: &str = "No parent";

/// Legal new parent for an item, as offered by the move and add dialogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveTarget {
    pub parent: Parent,
    pub label: String,
    pub level: usize,
}

/// Drop-target mode of a rendered row, as the hitbox collaborator expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemMode {
    Standard,
    Expanded,
    LastInGroup,
}

impl fmt::Display for ItemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemMode::Standard => "standard",
            ItemMode::Expanded => "expanded",
            ItemMode::LastInGroup => "last-in-group",
        };
        f.write_str(s)
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleRow {
    pub id: ItemId,
    pub level: usize,
    pub index: usize,
    pub mode: ItemMode,
}

#[derive(Debug, Clone)]
struct Entry {
    parent: Parent,
    index: usize,
}

/// Parent and sibling index of every item.
#[derive(Debug, Default)]
struct TreeIndex {
    entries: HashMap<ItemId, Entry>,
}

impl TreeIndex {
    fn build(tree: &Tree) -> Self {
        fn walk(items: &[TreeItem], parent: &Parent, entries: &mut HashMap<ItemId, Entry>) {
            for (index, item) in items.iter().enumerate() {
                entries.insert(
                    item.id.clone(),
                    Entry {
                        parent: parent.clone(),
                        index,
                    },
                );
                walk(&item.children, &Parent::Item(item.id.clone()), entries);
            }
        }

        let mut entries = HashMap::with_capacity(tree.len());
        walk(tree.items(), &Parent::Root, &mut entries);
        Self { entries }
    }
}

/// Immutable view of one committed tree revision.
#[derive(Debug)]
pub struct Snapshot {
    tree: Tree,
    revision: u64,
    index: OnceCell<TreeIndex>,
}

impl Snapshot {
    pub fn new(tree: Tree, revision: u64) -> Self {
        Self {
            tree,
            revision,
            index: OnceCell::new(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn index(&self) -> &TreeIndex {
        self.index.get_or_init(|| TreeIndex::build(&self.tree))
    }

    fn entry(&self, id: &ItemId) -> TreeResult<&Entry> {
        self.index().entries.get(id).ok_or_else(|| {
            warn!(%id, revision = self.revision, "lookup of unknown item");
            DomainError::ItemNotFound(id.clone())
        })
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index().entries.contains_key(id)
    }

    /// The item itself, located through the index.
    pub fn item(&self, id: &ItemId) -> TreeResult<&TreeItem> {
        let path = self.path_to_item(id)?;
        let mut siblings = self.tree.items();
        let mut found = None;
        for step in path.iter().chain(std::iter::once(id)) {
            let item = &siblings[self.entry(step)?.index];
            siblings = &item.children;
            found = Some(item);
        }
        found.ok_or_else(|| DomainError::ItemNotFound(id.clone()))
    }

    /// Ancestor ids from the root down to, excluding, `id`.
    pub fn path_to_item(&self, id: &ItemId) -> TreeResult<Vec<ItemId>> {
        let mut path = Vec::new();
        let mut parent = &self.entry(id)?.parent;
        while let Parent::Item(ancestor) = parent {
            path.push(ancestor.clone());
            parent = &self.entry(ancestor)?.parent;
        }
        path.reverse();
        Ok(path)
    }

    /// Current parent and sibling index of `id`.
    pub fn position_of(&self, id: &ItemId) -> TreeResult<(Parent, usize)> {
        let entry = self.entry(id)?;
        Ok((entry.parent.clone(), entry.index))
    }

    /// Direct children of `parent`; the top-level items for the root.
    pub fn children_of_item(&self, parent: &Parent) -> TreeResult<&[TreeItem]> {
        match parent {
            Parent::Root => Ok(self.tree.items()),
            Parent::Item(id) => self
                .item(id)
                .map(|item| item.children.as_slice())
                .map_err(|_| DomainError::ParentNotFound(parent.clone())),
        }
    }

    /// Every legal new parent for `item_id`, the root first.
    ///
    /// Excludes the item and its subtree. An id that is not in the tree yet
    /// (the add dialog's fresh id) excludes nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn move_targets(&self, item_id: &ItemId) -> Vec<MoveTarget> {
        let root = MoveTarget {
            parent: Parent::Root,
            label: NO_PARENT_LABEL.to_string(),
            level: 0,
        };
        std::iter::once(root)
            .chain(
                self.tree
                    .iter()
                    .filter(|(_, item)| {
                        is_legal_parent(&self.tree, item_id, &Parent::Item(item.id.clone()))
                    })
                    .map(|(level, item)| MoveTarget {
                        parent: Parent::Item(item.id.clone()),
                        label: item.label.clone(),
                        level,
                    }),
            )
            .collect()
    }

    /// Rows to render: depth-first, descending only into open items.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        fn walk(items: &[TreeItem], level: usize, rows: &mut Vec<VisibleRow>) {
            let last = items.len().saturating_sub(1);
            for (index, item) in items.iter().enumerate() {
                let expanded = !item.is_leaf() && item.is_open;
                let mode = if expanded {
                    ItemMode::Expanded
                } else if index == last {
                    ItemMode::LastInGroup
                } else {
                    ItemMode::Standard
                };
                rows.push(VisibleRow {
                    id: item.id.clone(),
                    level,
                    index,
                    mode,
                });
                if expanded {
                    walk(&item.children, level + 1, rows);
                }
            }
        }

        let mut rows = Vec::new();
        walk(self.tree.items(), 0, &mut rows);
        rows
    }

    /// Row that would receive the drop described by `instruction` over
    /// `target`, if it is an item rather than the root.
    pub fn parent_of_instruction(
        &self,
        target: &ItemId,
        instruction: &Instruction,
    ) -> TreeResult<Option<ItemId>> {
        let path = self.path_to_item(target)?;
        Ok(instruction
            .parent_level()
            .and_then(|level| path.get(level).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    #[test]
    fn given_nested_item_when_locating_then_index_finds_it() {
        let snapshot = Snapshot::new(Tree::demo(), 0);
        assert_eq!(snapshot.item(&id("2.1")).unwrap().label, "Item 2.1");
        assert_eq!(snapshot.position_of(&id("3")).unwrap(), (Parent::Root, 2));
    }

    #[test]
    fn given_unknown_item_when_querying_path_then_errors() {
        let snapshot = Snapshot::new(Tree::demo(), 0);
        assert_eq!(
            snapshot.path_to_item(&id("missing")),
            Err(DomainError::ItemNotFound(id("missing")))
        );
    }
}
