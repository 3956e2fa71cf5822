//! Tree reducer: the single state-transition function.
//!
//! `reduce(tree, action)` computes the next tree without touching the
//! current one. Every transition either yields a complete new tree or
//! reports that nothing changed; there is no partial apply.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{
    is_legal_parent, resolve, Destination, DomainError, Instruction, ItemId, Parent, Resolution,
    Tree, TreeItem, TreeResult,
};

/// Closed set of actions accepted by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TreeAction {
    Toggle {
        item_id: ItemId,
    },
    Expand {
        item_id: ItemId,
    },
    Collapse {
        item_id: ItemId,
    },
    /// Drag-drop commit.
    Instruction {
        instruction: Instruction,
        item_id: ItemId,
        target_id: ItemId,
    },
    /// Dialog-driven move. `index` uses the same pre-detachment contract as
    /// drag-drop destinations.
    ModalMove {
        item_id: ItemId,
        #[serde(default)]
        target_id: Parent,
        index: usize,
    },
    ModalAdd {
        item_id: ItemId,
        item: TreeItem,
        #[serde(default)]
        target_id: Parent,
        index: usize,
    },
    /// Only label and colour of `item` are used.
    ModalEdit {
        item_id: ItemId,
        item: TreeItem,
    },
    NodeRemove {
        item_id: ItemId,
    },
}

impl TreeAction {
    pub fn kind(&self) -> &'static str {
        match self {
            TreeAction::Toggle { .. } => "toggle",
            TreeAction::Expand { .. } => "expand",
            TreeAction::Collapse { .. } => "collapse",
            TreeAction::Instruction { .. } => "instruction",
            TreeAction::ModalMove { .. } => "modal-move",
            TreeAction::ModalAdd { .. } => "modal-add",
            TreeAction::ModalEdit { .. } => "modal-edit",
            TreeAction::NodeRemove { .. } => "node-remove",
        }
    }

    pub fn item_id(&self) -> &ItemId {
        match self {
            TreeAction::Toggle { item_id }
            | TreeAction::Expand { item_id }
            | TreeAction::Collapse { item_id }
            | TreeAction::Instruction { item_id, .. }
            | TreeAction::ModalMove { item_id, .. }
            | TreeAction::ModalAdd { item_id, .. }
            | TreeAction::ModalEdit { item_id, .. }
            | TreeAction::NodeRemove { item_id } => item_id,
        }
    }
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reduction {
    Changed(Tree),
    Unchanged,
    /// Drop refused; carries `instruction-blocked` for the drop indicator.
    Blocked(Instruction),
    /// Dialog move into the item itself or into its own subtree.
    IllegalParent(Parent),
}

/// Compute the next tree for `action`.
///
/// `Err` means the action named ids that are not in `tree` (or would
/// duplicate one); the caller keeps the current tree in that case.
#[instrument(level = "debug", skip(tree), fields(kind = action.kind(), item = %action.item_id()))]
pub fn reduce(tree: &Tree, action: &TreeAction) -> TreeResult<Reduction> {
    let reduction = match action {
        TreeAction::Toggle { item_id } => {
            let item = lookup(tree, item_id)?;
            if item.is_leaf() {
                Reduction::Unchanged
            } else {
                Reduction::Changed(tree.set_open(item_id, !item.is_open)?)
            }
        }
        TreeAction::Expand { item_id } => {
            let item = lookup(tree, item_id)?;
            if item.is_leaf() || item.is_open {
                Reduction::Unchanged
            } else {
                Reduction::Changed(tree.set_open(item_id, true)?)
            }
        }
        TreeAction::Collapse { item_id } => {
            if lookup(tree, item_id)?.is_open {
                Reduction::Changed(tree.set_open(item_id, false)?)
            } else {
                Reduction::Unchanged
            }
        }
        TreeAction::Instruction {
            instruction,
            item_id,
            target_id,
        } => match resolve(tree, instruction, item_id, target_id)? {
            Resolution::Blocked(blocked) => Reduction::Blocked(blocked),
            Resolution::Move(destination) => move_item(tree, item_id, &destination)?,
        },
        TreeAction::ModalMove {
            item_id,
            target_id,
            index,
        } => {
            lookup(tree, item_id)?;
            ensure_parent(tree, target_id)?;
            if !is_legal_parent(tree, item_id, target_id) {
                Reduction::IllegalParent(target_id.clone())
            } else {
                move_item(tree, item_id, &Destination::new(target_id.clone(), *index))?
            }
        }
        TreeAction::ModalAdd {
            item_id,
            item,
            target_id,
            index,
        } => {
            if &item.id != item_id {
                return Err(DomainError::IdMismatch {
                    expected: item_id.clone(),
                    actual: item.id.clone(),
                });
            }
            // The new subtree must not reuse any id already in the tree.
            let incoming = Tree::new(vec![item.clone()]);
            incoming.check_unique_ids()?;
            if let Some((_, dup)) = incoming.iter().find(|(_, node)| tree.contains(&node.id)) {
                return Err(DomainError::DuplicateId(dup.id.clone()));
            }
            ensure_parent(tree, target_id)?;
            Reduction::Changed(tree.insert_at(target_id, *index, item.clone())?.normalized())
        }
        TreeAction::ModalEdit { item_id, item } => {
            let patch = item.patch();
            if lookup(tree, item_id)?.patch() == patch {
                Reduction::Unchanged
            } else {
                Reduction::Changed(tree.update_by_id(item_id, &patch)?)
            }
        }
        TreeAction::NodeRemove { item_id } => {
            Reduction::Changed(tree.delete_by_id(item_id)?.normalized())
        }
    };
    debug!(outcome = outcome_name(&reduction), "reduced");
    Ok(reduction)
}

/// Detach `item_id` and reinsert it at `destination`, compensating the
/// index for the slot the item leaves behind.
fn move_item(tree: &Tree, item_id: &ItemId, destination: &Destination) -> TreeResult<Reduction> {
    let origin = tree
        .position_of(item_id)
        .ok_or_else(|| DomainError::ItemNotFound(item_id.clone()))?;
    let index = destination.index_after_detaching(&origin);
    let (detached, item) = tree.remove_by_id(item_id)?;
    let next = detached
        .insert_at(&destination.parent, index, item)?
        .normalized();
    if &next == tree {
        Ok(Reduction::Unchanged)
    } else {
        Ok(Reduction::Changed(next))
    }
}

fn lookup<'a>(tree: &'a Tree, id: &ItemId) -> TreeResult<&'a TreeItem> {
    tree.find(id)
        .ok_or_else(|| DomainError::ItemNotFound(id.clone()))
}

fn ensure_parent(tree: &Tree, parent: &Parent) -> TreeResult<()> {
    match parent {
        Parent::Item(id) if !tree.contains(id) => Err(DomainError::ParentNotFound(parent.clone())),
        _ => Ok(()),
    }
}

fn outcome_name(reduction: &Reduction) -> &'static str {
    match reduction {
        Reduction::Changed(_) => "changed",
        Reduction::Unchanged => "unchanged",
        Reduction::Blocked(_) => "blocked",
        Reduction::IllegalParent(_) => "illegal-parent",
    }
}
