//! Row registry: interactive surfaces of mounted rows, keyed by item id.
//!
//! The registry belongs to one tree view and is dropped with it. Each
//! registration is a slot in a generational arena, so a guard left over
//! from an earlier mount of the same id cannot remove the current one.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use generational_arena::{Arena, Index};
use tracing::{debug, trace};

use crate::domain::ItemId;

/// Surfaces registered for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHandles<E> {
    pub element: E,
    pub action_menu_trigger: E,
}

#[derive(Debug)]
struct Slot<E> {
    item_id: ItemId,
    handles: RowHandles<E>,
}

#[derive(Debug)]
struct Inner<E> {
    arena: Arena<Slot<E>>,
    by_id: HashMap<ItemId, Index>,
}

impl<E> Inner<E> {
    fn unregister(&mut self, idx: Index) {
        let Some(slot) = self.arena.remove(idx) else {
            return;
        };
        // Only drop the id mapping if it still points at this registration.
        if self.by_id.get(&slot.item_id) == Some(&idx) {
            self.by_id.remove(&slot.item_id);
        }
        trace!(item = %slot.item_id, "row unregistered");
    }
}

/// Registry of mounted rows for one tree view.
#[derive(Debug)]
pub struct ItemRegistry<E> {
    inner: Rc<RefCell<Inner<E>>>,
}

impl<E> Default for ItemRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ItemRegistry<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                arena: Arena::new(),
                by_id: HashMap::new(),
            })),
        }
    }

    /// Register the surfaces of a mounted row. Dropping the returned guard
    /// unregisters it.
    #[must_use = "dropping the registration unregisters the row immediately"]
    pub fn register(&self, item_id: ItemId, element: E, action_menu_trigger: E) -> Registration<E> {
        let mut inner = self.inner.borrow_mut();
        let idx = inner.arena.insert(Slot {
            item_id: item_id.clone(),
            handles: RowHandles {
                element,
                action_menu_trigger,
            },
        });
        if let Some(previous) = inner.by_id.insert(item_id.clone(), idx) {
            // Remount without unmount: the older slot is superseded.
            inner.arena.remove(previous);
            debug!(item = %item_id, "row registration replaced");
        }
        Registration {
            registry: Rc::downgrade(&self.inner),
            idx,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_registered(&self, item_id: &ItemId) -> bool {
        self.inner.borrow().by_id.contains_key(item_id)
    }
}

impl<E: Clone> ItemRegistry<E> {
    pub fn handles(&self, item_id: &ItemId) -> Option<RowHandles<E>> {
        let inner = self.inner.borrow();
        let idx = inner.by_id.get(item_id)?;
        inner.arena.get(*idx).map(|slot| slot.handles.clone())
    }

    /// Row element used as drop target by the drag machinery.
    pub fn element(&self, item_id: &ItemId) -> Option<E> {
        self.handles(item_id).map(|h| h.element)
    }

    /// Surface to re-focus after a dialog changed the structure around
    /// `item_id`: its action menu trigger.
    pub fn focus_target(&self, item_id: &ItemId) -> Option<E> {
        self.handles(item_id).map(|h| h.action_menu_trigger)
    }
}

/// Disposer for one registration; unregisters on drop.
#[derive(Debug)]
pub struct Registration<E> {
    registry: Weak<RefCell<Inner<E>>>,
    idx: Index,
}

impl<E> Registration<E> {
    /// Explicit unmount.
    pub fn unregister(self) {
        drop(self)
    }
}

impl<E> Drop for Registration<E> {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().unregister(self.idx);
        }
    }
}
