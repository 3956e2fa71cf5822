//! Application services
//!
//! Concrete services that own tree state and derive views from it.
//! Everything here runs on a single thread, driven by discrete events.

mod drag;
pub mod forms;
mod queries;
mod registry;
mod store;
mod view;

pub use drag::{DragSession, DragSource, ExpandTimer, TimerToken};
pub use queries::{ItemMode, MoveTarget, Snapshot, VisibleRow, NO_PARENT_LABEL};
pub use registry::{ItemRegistry, Registration, RowHandles};
pub use store::{Dispatched, TreeStore};
pub use view::TreeView;
