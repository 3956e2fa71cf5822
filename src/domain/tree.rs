//! Tree model: the forest value and pure queries/mutations over it.
//!
//! Every mutation works on a copy and returns the new tree, so a `Tree`
//! can be treated as a plain value: compared, logged, kept as a snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::entities::{Color, ItemId, ItemPatch, Parent, TreeItem};
use crate::domain::error::{DomainError, TreeResult};

/// Ordered sequence of top-level items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    #[serde(default)]
    items: Vec<TreeItem>,
}

impl Tree {
    pub fn new(items: Vec<TreeItem>) -> Self {
        Self { items }
    }

    /// The demo forest shown when no seed is given.
    pub fn demo() -> Self {
        Self::new(vec![
            TreeItem::new("1", "Item 1").with_color(Color::Blue),
            TreeItem::new("2", "Item 2")
                .with_color(Color::Green)
                .with_children(vec![TreeItem::new("2.1", "Item 2.1").with_color(Color::Teal)]),
            TreeItem::new("3", "Item 3").with_color(Color::Orange),
        ])
    }

    pub fn items(&self) -> &[TreeItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<TreeItem> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of nodes in the whole forest.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Depth-first, pre-order walk yielding `(level, item)`.
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter::new(&self.items)
    }

    pub fn depth(&self) -> usize {
        fn calculate_depth(items: &[TreeItem]) -> usize {
            items
                .iter()
                .map(|item| 1 + calculate_depth(&item.children))
                .max()
                .unwrap_or(0)
        }
        calculate_depth(&self.items)
    }

    pub fn find(&self, id: &ItemId) -> Option<&TreeItem> {
        self.iter().map(|(_, item)| item).find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.find(id).is_some()
    }

    /// First id that occurs more than once in the forest.
    pub fn check_unique_ids(&self) -> TreeResult<()> {
        let mut seen = HashSet::new();
        match self.iter().find(|(_, item)| !seen.insert(&item.id)) {
            Some((_, item)) => Err(DomainError::DuplicateId(item.id.clone())),
            None => Ok(()),
        }
    }

    /// Ancestor ids from the forest root down to, excluding, `id`.
    /// `None` when `id` is not in the tree.
    #[instrument(level = "trace", skip(self))]
    pub fn path_to(&self, id: &ItemId) -> Option<Vec<ItemId>> {
        fn walk(items: &[TreeItem], id: &ItemId, trail: &mut Vec<ItemId>) -> bool {
            for item in items {
                if &item.id == id {
                    return true;
                }
                trail.push(item.id.clone());
                if walk(&item.children, id, trail) {
                    return true;
                }
                trail.pop();
            }
            false
        }

        let mut trail = Vec::new();
        walk(&self.items, id, &mut trail).then_some(trail)
    }

    /// Direct children of `parent`, or the top-level items for the root.
    /// `None` when the parent item does not exist.
    pub fn children_of(&self, parent: &Parent) -> Option<&[TreeItem]> {
        match parent {
            Parent::Root => Some(&self.items),
            Parent::Item(id) => self.find(id).map(|item| item.children.as_slice()),
        }
    }

    /// Current parent and sibling index of `id`.
    pub fn position_of(&self, id: &ItemId) -> Option<(Parent, usize)> {
        let path = self.path_to(id)?;
        let parent = Parent::from(path.last().cloned());
        let index = self
            .children_of(&parent)?
            .iter()
            .position(|item| &item.id == id)?;
        Some((parent, index))
    }

    /// Whether `candidate` lies strictly inside the subtree of `ancestor`.
    /// A node is never its own descendant.
    pub fn is_descendant(&self, ancestor: &ItemId, candidate: &ItemId) -> bool {
        self.find(ancestor)
            .map(|node| TreeIter::new(&node.children).any(|(_, item)| &item.id == candidate))
            .unwrap_or(false)
    }

    /// New tree with `item` inserted into `parent`'s children at `index`,
    /// clamped to `[0, len]`.
    #[instrument(level = "trace", skip(self, item), fields(item = %item.id))]
    pub fn insert_at(&self, parent: &Parent, index: usize, item: TreeItem) -> TreeResult<Tree> {
        let mut next = self.clone();
        let siblings = next
            .children_mut(parent)
            .ok_or_else(|| DomainError::ParentNotFound(parent.clone()))?;
        let index = index.min(siblings.len());
        siblings.insert(index, item);
        Ok(next)
    }

    /// New tree with the subtree at `id` detached, plus that subtree.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_by_id(&self, id: &ItemId) -> TreeResult<(Tree, TreeItem)> {
        fn take(items: &mut Vec<TreeItem>, id: &ItemId) -> Option<TreeItem> {
            if let Some(pos) = items.iter().position(|item| &item.id == id) {
                return Some(items.remove(pos));
            }
            items.iter_mut().find_map(|item| take(&mut item.children, id))
        }

        let mut next = self.clone();
        let removed =
            take(&mut next.items, id).ok_or_else(|| DomainError::ItemNotFound(id.clone()))?;
        Ok((next, removed))
    }

    /// New tree with the label and colour of `id` replaced.
    /// Children and position are left alone.
    pub fn update_by_id(&self, id: &ItemId, patch: &ItemPatch) -> TreeResult<Tree> {
        self.modify(id, |item| {
            item.label = patch.label.clone();
            item.color = patch.color;
        })
    }

    /// New tree without `id` and everything below it.
    pub fn delete_by_id(&self, id: &ItemId) -> TreeResult<Tree> {
        self.remove_by_id(id).map(|(tree, _)| tree)
    }

    /// New tree with the expansion flag of `id` set.
    pub fn set_open(&self, id: &ItemId, open: bool) -> TreeResult<Tree> {
        self.modify(id, |item| item.is_open = open)
    }

    /// Copy of the tree where no leaf is marked open.
    pub fn normalized(&self) -> Tree {
        fn close_leaves(items: &mut [TreeItem]) {
            for item in items {
                if item.children.is_empty() {
                    item.is_open = false;
                } else {
                    close_leaves(&mut item.children);
                }
            }
        }

        let mut next = self.clone();
        close_leaves(&mut next.items);
        next
    }

    fn modify(&self, id: &ItemId, f: impl FnOnce(&mut TreeItem)) -> TreeResult<Tree> {
        let mut next = self.clone();
        let item =
            find_mut(&mut next.items, id).ok_or_else(|| DomainError::ItemNotFound(id.clone()))?;
        f(item);
        Ok(next)
    }

    fn children_mut(&mut self, parent: &Parent) -> Option<&mut Vec<TreeItem>> {
        match parent {
            Parent::Root => Some(&mut self.items),
            Parent::Item(id) => find_mut(&mut self.items, id).map(|item| &mut item.children),
        }
    }
}

impl From<Vec<TreeItem>> for Tree {
    fn from(items: Vec<TreeItem>) -> Self {
        Self::new(items)
    }
}

fn find_mut<'a>(items: &'a mut [TreeItem], id: &ItemId) -> Option<&'a mut TreeItem> {
    for item in items.iter_mut() {
        if &item.id == id {
            return Some(item);
        }
        if let Some(found) = find_mut(&mut item.children, id) {
            return Some(found);
        }
    }
    None
}

pub struct TreeIter<'a> {
    stack: Vec<(usize, &'a TreeItem)>,
}

impl<'a> TreeIter<'a> {
    pub(crate) fn new(items: &'a [TreeItem]) -> Self {
        // Push in reverse for left-to-right traversal
        let stack = items.iter().rev().map(|item| (0, item)).collect();
        Self { stack }
    }
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = (usize, &'a TreeItem);

    fn next(&mut self) -> Option<Self::Item> {
        let (level, node) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((level + 1, child));
        }
        Some((level, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    #[test]
    fn given_demo_tree_when_iterating_then_visits_in_preorder_with_levels() {
        let tree = Tree::demo();
        let visited: Vec<(usize, &str)> = tree.iter().map(|(l, i)| (l, i.id.as_str())).collect();
        assert_eq!(visited, vec![(0, "1"), (0, "2"), (1, "2.1"), (0, "3")]);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn given_nested_item_when_getting_position_then_returns_parent_and_index() {
        let tree = Tree::demo();
        assert_eq!(tree.position_of(&id("2.1")), Some((Parent::from("2"), 0)));
        assert_eq!(tree.position_of(&id("3")), Some((Parent::Root, 2)));
        assert_eq!(tree.position_of(&id("nope")), None);
    }

    #[test]
    fn given_leaf_marked_open_when_normalizing_then_flag_is_cleared() {
        let tree = Tree::new(vec![TreeItem::new("a", "A").opened()]);
        assert!(!tree.normalized().items()[0].is_open);
    }
}
