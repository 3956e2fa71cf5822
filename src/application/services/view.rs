//! Tree view context: what the rows and dialogs of one mounted tree share.

use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use crate::application::reducer::TreeAction;
use crate::application::services::drag::DragSession;
use crate::application::services::queries::{MoveTarget, VisibleRow};
use crate::application::services::registry::{ItemRegistry, Registration};
use crate::application::services::store::{Dispatched, TreeStore};
use crate::application::ApplicationResult;
use crate::domain::{ItemId, Parent, Tree, TreeItem};

/// One mounted tree view.
///
/// Owns the store and the row registry for its lifetime; the `context_id`
/// keeps drags from other views out.
#[derive(Debug)]
pub struct TreeView<E> {
    context_id: Uuid,
    store: TreeStore,
    registry: ItemRegistry<E>,
    expand_delay: Duration,
}

impl<E> TreeView<E> {
    pub fn mount(tree: Tree, expand_delay: Duration) -> Self {
        let context_id = Uuid::new_v4();
        info!(%context_id, items = tree.len(), "tree view mounted");
        Self {
            context_id,
            store: TreeStore::new(tree),
            registry: ItemRegistry::new(),
            expand_delay,
        }
    }

    pub fn context_id(&self) -> Uuid {
        self.context_id
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TreeStore {
        &mut self.store
    }

    pub fn tree(&self) -> &Tree {
        self.store.tree()
    }

    pub fn dispatch(&mut self, action: TreeAction) -> ApplicationResult<Dispatched> {
        self.store.dispatch(action)
    }

    pub fn get_path_to_item(&self, item_id: &ItemId) -> ApplicationResult<Vec<ItemId>> {
        Ok(self.store.queries().path_to_item(item_id)?)
    }

    pub fn get_children_of_item(&self, parent: &Parent) -> ApplicationResult<Vec<TreeItem>> {
        Ok(self.store.queries().children_of_item(parent)?.to_vec())
    }

    pub fn get_move_targets(&self, item_id: &ItemId) -> Vec<MoveTarget> {
        self.store.queries().move_targets(item_id)
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        self.store.queries().visible_rows()
    }

    pub fn register_tree_item(
        &self,
        item_id: ItemId,
        element: E,
        action_menu_trigger: E,
    ) -> Registration<E> {
        self.registry.register(item_id, element, action_menu_trigger)
    }

    pub fn registry(&self) -> &ItemRegistry<E> {
        &self.registry
    }

    pub fn start_drag(&mut self, item_id: ItemId) -> ApplicationResult<DragSession> {
        DragSession::start(&mut self.store, self.context_id, item_id, self.expand_delay)
    }
}

impl<E: Clone> TreeView<E> {
    /// Dispatch a dialog action and return the surface to re-focus.
    pub fn dispatch_from_dialog(
        &mut self,
        action: TreeAction,
    ) -> ApplicationResult<(Dispatched, Option<E>)> {
        let item_id = action.item_id().clone();
        let dispatched = self.store.dispatch(action)?;
        Ok((dispatched, self.registry.focus_target(&item_id)))
    }
}
