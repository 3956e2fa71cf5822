//! Tree store: owns the committed tree and applies actions in order.

use std::rc::Rc;

use tracing::{debug, info, instrument, warn};

use crate::application::reducer::{reduce, Reduction, TreeAction};
use crate::application::services::queries::Snapshot;
use crate::application::ApplicationResult;
use crate::domain::{Instruction, Parent, Tree};

/// What a dispatch did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Applied { revision: u64 },
    Unchanged,
    Blocked(Instruction),
    IllegalParent(Parent),
}

impl Dispatched {
    pub fn is_applied(&self) -> bool {
        matches!(self, Dispatched::Applied { .. })
    }
}

/// Single owner of the tree value.
///
/// Readers take a [`Snapshot`] handle; a dispatch that changes the tree
/// replaces the snapshot and bumps the revision, leaving handles held by
/// readers pointing at the old, still consistent, revision.
#[derive(Debug)]
pub struct TreeStore {
    snapshot: Rc<Snapshot>,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new(Tree::default())
    }
}

impl TreeStore {
    pub fn new(tree: Tree) -> Self {
        Self {
            snapshot: Rc::new(Snapshot::new(tree.normalized(), 0)),
        }
    }

    pub fn tree(&self) -> &Tree {
        self.snapshot.tree()
    }

    pub fn revision(&self) -> u64 {
        self.snapshot.revision()
    }

    /// Derived queries over the current revision.
    pub fn queries(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Handle to the current revision that outlives later dispatches.
    pub fn snapshot(&self) -> Rc<Snapshot> {
        Rc::clone(&self.snapshot)
    }

    /// Apply `action` to the current tree.
    ///
    /// On `Err` the tree is left exactly as it was.
    #[instrument(level = "debug", skip(self))]
    pub fn dispatch(&mut self, action: TreeAction) -> ApplicationResult<Dispatched> {
        let reduction = reduce(self.tree(), &action).map_err(|e| {
            warn!(kind = action.kind(), error = %e, "dispatch rejected");
            e
        })?;

        let dispatched = match reduction {
            Reduction::Changed(tree) => {
                let revision = self.revision() + 1;
                self.snapshot = Rc::new(Snapshot::new(tree, revision));
                Dispatched::Applied { revision }
            }
            Reduction::Unchanged => Dispatched::Unchanged,
            Reduction::Blocked(instruction) => {
                info!(kind = action.kind(), item = %action.item_id(), "drop blocked");
                Dispatched::Blocked(instruction)
            }
            Reduction::IllegalParent(parent) => {
                info!(item = %action.item_id(), %parent, "move into own subtree refused");
                Dispatched::IllegalParent(parent)
            }
        };
        debug!(kind = action.kind(), ?dispatched, "dispatched");
        Ok(dispatched)
    }
}
