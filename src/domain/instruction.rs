//! Drop instructions and their interpretation against a tree.
//!
//! The hitbox collaborator classifies the pointer position over a row into
//! an [`Instruction`]. [`resolve`] turns it into a concrete destination
//! `(parent, index)` or blocks it. Resolution is pure and cheap: it runs on
//! every pointer move during a drag and never touches the committed tree.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::entities::{ItemId, Parent};
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::tree::Tree;

/// Pixels per nesting level used when the collaborator does not say.
pub const DEFAULT_INDENT_PER_LEVEL: u32 = 32;

fn default_indent() -> u32 {
    DEFAULT_INDENT_PER_LEVEL
}

/// Classified drop intent for one target row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Instruction {
    ReorderAbove {
        #[serde(default)]
        current_level: usize,
        #[serde(default = "default_indent")]
        indent_per_level: u32,
    },
    ReorderBelow {
        #[serde(default)]
        current_level: usize,
        #[serde(default = "default_indent")]
        indent_per_level: u32,
    },
    MakeChild {
        #[serde(default)]
        current_level: usize,
        #[serde(default = "default_indent")]
        indent_per_level: u32,
    },
    Reparent {
        #[serde(default)]
        current_level: usize,
        #[serde(default = "default_indent")]
        indent_per_level: u32,
        desired_level: usize,
    },
    /// Intent that cannot be honoured; kept so the UI can still show it.
    #[serde(rename = "instruction-blocked")]
    Blocked { desired: Box<Instruction> },
}

/// Instruction tag without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    ReorderAbove,
    ReorderBelow,
    MakeChild,
    Reparent,
    Blocked,
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstructionKind::ReorderAbove => "reorder-above",
            InstructionKind::ReorderBelow => "reorder-below",
            InstructionKind::MakeChild => "make-child",
            InstructionKind::Reparent => "reparent",
            InstructionKind::Blocked => "instruction-blocked",
        };
        f.write_str(s)
    }
}

impl Instruction {
    pub fn reorder_above(current_level: usize) -> Self {
        Instruction::ReorderAbove {
            current_level,
            indent_per_level: DEFAULT_INDENT_PER_LEVEL,
        }
    }

    pub fn reorder_below(current_level: usize) -> Self {
        Instruction::ReorderBelow {
            current_level,
            indent_per_level: DEFAULT_INDENT_PER_LEVEL,
        }
    }

    pub fn make_child(current_level: usize) -> Self {
        Instruction::MakeChild {
            current_level,
            indent_per_level: DEFAULT_INDENT_PER_LEVEL,
        }
    }

    pub fn reparent(current_level: usize, desired_level: usize) -> Self {
        Instruction::Reparent {
            current_level,
            indent_per_level: DEFAULT_INDENT_PER_LEVEL,
            desired_level,
        }
    }

    /// Wrap into `instruction-blocked`. Blocking twice is a no-op.
    pub fn blocked(self) -> Self {
        match self {
            Instruction::Blocked { .. } => self,
            other => Instruction::Blocked {
                desired: Box::new(other),
            },
        }
    }

    pub fn kind(&self) -> InstructionKind {
        match self {
            Instruction::ReorderAbove { .. } => InstructionKind::ReorderAbove,
            Instruction::ReorderBelow { .. } => InstructionKind::ReorderBelow,
            Instruction::MakeChild { .. } => InstructionKind::MakeChild,
            Instruction::Reparent { .. } => InstructionKind::Reparent,
            Instruction::Blocked { .. } => InstructionKind::Blocked,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Instruction::Blocked { .. })
    }

    /// The wrapped intent for blocked instructions, `self` otherwise.
    pub fn desired(&self) -> &Instruction {
        match self {
            Instruction::Blocked { desired } => desired.desired(),
            other => other,
        }
    }

    pub fn current_level(&self) -> usize {
        match self.desired() {
            Instruction::ReorderAbove { current_level, .. }
            | Instruction::ReorderBelow { current_level, .. }
            | Instruction::MakeChild { current_level, .. }
            | Instruction::Reparent { current_level, .. } => *current_level,
            Instruction::Blocked { .. } => 0,
        }
    }

    /// Level of the row that would become the parent of the dropped item.
    /// `None` means the forest root.
    pub fn parent_level(&self) -> Option<usize> {
        match self.desired() {
            Instruction::Reparent { desired_level, .. } => desired_level.checked_sub(1),
            other => other.current_level().checked_sub(1),
        }
    }
}

/// Where a move lands, expressed before the moved item is detached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub parent: Parent,
    pub index: usize,
}

impl Destination {
    pub fn new(parent: impl Into<Parent>, index: usize) -> Self {
        Self {
            parent: parent.into(),
            index,
        }
    }

    /// Index to use once the item has been removed from `origin`.
    ///
    /// Removing an item that sits before the destination in the same list
    /// shifts the destination one slot to the left.
    pub fn index_after_detaching(&self, origin: &(Parent, usize)) -> usize {
        let (origin_parent, origin_index) = origin;
        if origin_parent == &self.parent && *origin_index < self.index {
            self.index - 1
        } else {
            self.index
        }
    }
}

/// Outcome of interpreting an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Move(Destination),
    Blocked(Instruction),
}

impl Resolution {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Resolution::Blocked(_))
    }
}

/// Whether `parent` may receive `dragged`: the root always may, an item
/// may unless it is `dragged` itself or lies inside its subtree.
pub fn is_legal_parent(tree: &Tree, dragged: &ItemId, parent: &Parent) -> bool {
    match parent {
        Parent::Root => true,
        Parent::Item(id) => id != dragged && !tree.is_descendant(dragged, id),
    }
}

/// Resolve `instruction` for dropping `dragged` onto the row `target`.
///
/// Unknown ids are a contract violation and come back as `Err`. Illegal
/// drops (self-drop, nesting into the own subtree) come back as
/// `Resolution::Blocked` carrying the instruction wrapped for display.
pub fn resolve(
    tree: &Tree,
    instruction: &Instruction,
    dragged: &ItemId,
    target: &ItemId,
) -> TreeResult<Resolution> {
    if !tree.contains(dragged) {
        return Err(DomainError::ItemNotFound(dragged.clone()));
    }
    let target_path = tree
        .path_to(target)
        .ok_or_else(|| DomainError::ItemNotFound(target.clone()))?;

    let destination = match instruction {
        Instruction::Blocked { .. } => return Ok(Resolution::Blocked(instruction.clone())),
        Instruction::ReorderAbove { .. } | Instruction::ReorderBelow { .. } => {
            let parent = Parent::from(target_path.last().cloned());
            let index = sibling_index(tree, &parent, target)?;
            let offset = usize::from(matches!(instruction, Instruction::ReorderBelow { .. }));
            Destination::new(parent, index + offset)
        }
        // Nests at the front of the target's children.
        Instruction::MakeChild { .. } => Destination::new(target.clone(), 0),
        Instruction::Reparent { desired_level, .. } => {
            let Some(ancestor) = target_path.get(*desired_level) else {
                trace!(desired_level, depth = target_path.len(), "reparent level out of range");
                return Ok(Resolution::Blocked(instruction.clone().blocked()));
            };
            let parent = Parent::from(
                desired_level
                    .checked_sub(1)
                    .map(|level| target_path[level].clone()),
            );
            let index = sibling_index(tree, &parent, ancestor)?;
            Destination::new(parent, index + 1)
        }
    };

    if dragged == target || !is_legal_parent(tree, dragged, &destination.parent) {
        trace!(%dragged, %target, parent = %destination.parent, "drop blocked");
        return Ok(Resolution::Blocked(instruction.clone().blocked()));
    }
    Ok(Resolution::Move(destination))
}

fn sibling_index(tree: &Tree, parent: &Parent, id: &ItemId) -> TreeResult<usize> {
    tree.children_of(parent)
        .and_then(|siblings| siblings.iter().position(|item| &item.id == id))
        .ok_or_else(|| DomainError::ItemNotFound(id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_blocked_instruction_when_blocking_again_then_stays_single_wrapped() {
        let blocked = Instruction::make_child(1).blocked().blocked();
        assert_eq!(blocked.desired(), &Instruction::make_child(1));
        assert_eq!(blocked.kind(), InstructionKind::Blocked);
    }

    #[test]
    fn given_instructions_when_computing_parent_level_then_uses_desired_level_for_reparent() {
        assert_eq!(Instruction::reorder_above(0).parent_level(), None);
        assert_eq!(Instruction::make_child(2).parent_level(), Some(1));
        assert_eq!(Instruction::reparent(3, 1).parent_level(), Some(0));
        assert_eq!(Instruction::reparent(3, 1).blocked().parent_level(), Some(0));
    }

    #[test]
    fn given_same_list_move_forward_when_detaching_then_index_shifts_left() {
        let dest = Destination::new(Parent::Root, 3);
        assert_eq!(dest.index_after_detaching(&(Parent::Root, 1)), 2);
        assert_eq!(dest.index_after_detaching(&(Parent::Root, 3)), 3);
        assert_eq!(dest.index_after_detaching(&(Parent::from("x"), 0)), 3);
    }
}
