//! Dialog forms: turn add/edit/move/remove input into reducer actions.
//!
//! Dialogs collect a label, a colour, a parent and a 1-based position.
//! Validation happens here, so invalid input never becomes an action.

use tracing::debug;

use crate::application::error::FormError;
use crate::application::reducer::TreeAction;
use crate::application::services::queries::{MoveTarget, Snapshot};
use crate::application::ApplicationResult;
use crate::domain::{Color, ItemId, Parent, TreeItem};

/// 1-based positions offered for inserting `moving` under `parent`.
///
/// The moving item is left out of the count: it is detached before it is
/// reinserted.
pub fn position_options(
    snapshot: &Snapshot,
    parent: &Parent,
    moving: &ItemId,
) -> ApplicationResult<Vec<usize>> {
    let siblings = snapshot
        .children_of_item(parent)?
        .iter()
        .filter(|item| &item.id != moving)
        .count();
    Ok((1..=siblings + 1).collect())
}

/// Parent picker entries; the first one is the root ("No parent").
pub fn parent_options(snapshot: &Snapshot, item_id: &ItemId) -> Vec<MoveTarget> {
    snapshot.move_targets(item_id)
}

fn check_position(options: &[usize], position: usize) -> Result<usize, FormError> {
    if options.contains(&position) {
        Ok(position - 1)
    } else {
        Err(FormError::PositionOutOfRange {
            position,
            max: options.len(),
        })
    }
}

fn check_label(label: &str) -> Result<String, FormError> {
    let label = label.trim();
    if label.is_empty() {
        Err(FormError::EmptyLabel)
    } else {
        Ok(label.to_string())
    }
}

/// Move dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveForm {
    pub item_id: ItemId,
    pub parent: Parent,
    pub position: usize,
}

impl MoveForm {
    /// Prefilled with the current parent and position 1.
    pub fn new(snapshot: &Snapshot, item_id: ItemId) -> ApplicationResult<Self> {
        let (parent, _) = snapshot.position_of(&item_id)?;
        Ok(Self {
            item_id,
            parent,
            position: 1,
        })
    }

    /// Switch parent; the position falls back to the first slot.
    pub fn select_parent(&mut self, parent: Parent) {
        self.parent = parent;
        self.position = 1;
    }

    pub fn position_options(&self, snapshot: &Snapshot) -> ApplicationResult<Vec<usize>> {
        position_options(snapshot, &self.parent, &self.item_id)
    }

    /// Build the `modal-move` action.
    ///
    /// The chosen slot counts siblings without the moving item; the reducer
    /// expects an index counted before detaching, so a slot at or after the
    /// item's current place in the same list moves one to the right.
    pub fn into_action(self, snapshot: &Snapshot) -> ApplicationResult<TreeAction> {
        let options = self.position_options(snapshot)?;
        let slot = check_position(&options, self.position)?;
        let (origin_parent, origin_index) = snapshot.position_of(&self.item_id)?;
        let index = if origin_parent == self.parent && origin_index <= slot {
            slot + 1
        } else {
            slot
        };
        debug!(item = %self.item_id, parent = %self.parent, slot, index, "move form submitted");
        Ok(TreeAction::ModalMove {
            item_id: self.item_id,
            target_id: self.parent,
            index,
        })
    }
}

/// Add dialog. Holds the id the new item will get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddForm {
    pub item_id: ItemId,
    pub label: String,
    pub color: Option<Color>,
    pub parent: Parent,
    pub position: usize,
}

impl Default for AddForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AddForm {
    pub fn new() -> Self {
        Self {
            item_id: ItemId::generate(),
            label: String::new(),
            color: None,
            parent: Parent::Root,
            position: 1,
        }
    }

    pub fn select_parent(&mut self, parent: Parent) {
        self.parent = parent;
        self.position = 1;
    }

    pub fn position_options(&self, snapshot: &Snapshot) -> ApplicationResult<Vec<usize>> {
        position_options(snapshot, &self.parent, &self.item_id)
    }

    /// Build the `modal-add` action; items without a colour get `default_color`.
    pub fn into_action(
        self,
        snapshot: &Snapshot,
        default_color: Color,
    ) -> ApplicationResult<TreeAction> {
        let label = check_label(&self.label)?;
        let options = self.position_options(snapshot)?;
        let index = check_position(&options, self.position)?;
        let item = TreeItem::new(self.item_id.clone(), label)
            .with_color(self.color.unwrap_or(default_color));
        Ok(TreeAction::ModalAdd {
            item_id: self.item_id,
            item,
            target_id: self.parent,
            index,
        })
    }
}

/// Edit dialog, prefilled from the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub item_id: ItemId,
    pub label: String,
    pub color: Color,
}

impl EditForm {
    pub fn from_item(item: &TreeItem) -> Self {
        Self {
            item_id: item.id.clone(),
            label: item.label.clone(),
            color: item.color,
        }
    }

    pub fn into_action(self) -> ApplicationResult<TreeAction> {
        let label = check_label(&self.label)?;
        let item = TreeItem::new(self.item_id.clone(), label).with_color(self.color);
        Ok(TreeAction::ModalEdit {
            item_id: self.item_id,
            item,
        })
    }
}

/// Confirmation text shown before removing an item.
pub fn confirm_remove(item: &TreeItem) -> String {
    format!("Are you sure you want to remove \"{}\"?", item.label)
}

pub fn remove_action(item: &TreeItem) -> TreeAction {
    TreeAction::NodeRemove {
        item_id: item.id.clone(),
    }
}

/// Parse a colour name typed into a form.
pub fn parse_color(name: &str) -> Result<Color, FormError> {
    Color::parse(name).ok_or_else(|| FormError::UnknownColor(name.to_string()))
}
