//! Drag session: one drag gesture from pick-up to drop.
//!
//! Hovering only interprets instructions against the current snapshot; the
//! committed tree changes only through dispatches (collapse on start,
//! timed expand, the drop itself, re-expand after drop).

use std::time::{Duration, Instant};

use tracing::{debug, instrument, trace};
use uuid::Uuid;

use crate::application::reducer::TreeAction;
use crate::application::services::store::{Dispatched, TreeStore};
use crate::application::ApplicationResult;
use crate::domain::{resolve, Instruction, InstructionKind, ItemId, Resolution};

/// Handle of one scheduled expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone)]
struct PendingExpand {
    token: TimerToken,
    item_id: ItemId,
    deadline: Instant,
}

/// Expand-after-hover timer driven by caller-supplied instants.
///
/// At most one expand is pending. Scheduling or cancelling invalidates the
/// previous token, so a stale expand can never fire.
#[derive(Debug, Clone)]
pub struct ExpandTimer {
    delay: Duration,
    next_token: u64,
    pending: Option<PendingExpand>,
}

impl ExpandTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_token: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, item_id: ItemId, now: Instant) -> TimerToken {
        self.cancel();
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        trace!(item = %item_id, ?token, "expand scheduled");
        self.pending = Some(PendingExpand {
            token,
            item_id,
            deadline: now + self.delay,
        });
        token
    }

    pub fn cancel(&mut self) -> Option<TimerToken> {
        let cancelled = self.pending.take().map(|p| p.token);
        if let Some(token) = cancelled {
            trace!(?token, "expand cancelled");
        }
        cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_live(&self, token: TimerToken) -> bool {
        self.pending.as_ref().is_some_and(|p| p.token == token)
    }

    pub fn pending_item(&self) -> Option<&ItemId> {
        self.pending.as_ref().map(|p| &p.item_id)
    }

    /// Item whose expand is due at `now`. Fires at most once per token.
    pub fn fire_due(&mut self, now: Instant) -> Option<ItemId> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.pending.take().map(|p| p.item_id),
            _ => None,
        }
    }
}

/// Payload carried by the dragged row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSource {
    pub item_id: ItemId,
    pub context_id: Uuid,
    pub is_open_on_drag_start: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoKey {
    revision: u64,
    dragged: ItemId,
    target: ItemId,
    raw: Instruction,
}

#[derive(Debug, Clone)]
struct Hover {
    target: ItemId,
    raw: Instruction,
    shown: Option<Instruction>,
}

/// State of one drag gesture.
#[derive(Debug)]
pub struct DragSession {
    source: DragSource,
    hover: Option<Hover>,
    timer: ExpandTimer,
    memo: Option<(MemoKey, Resolution)>,
}

impl DragSession {
    /// Pick up `item_id`. An open item is collapsed for the duration of
    /// the drag.
    #[instrument(level = "debug", skip(store))]
    pub fn start(
        store: &mut TreeStore,
        context_id: Uuid,
        item_id: ItemId,
        expand_delay: Duration,
    ) -> ApplicationResult<Self> {
        let is_open = store.queries().item(&item_id)?.is_open;
        if is_open {
            store.dispatch(TreeAction::Collapse {
                item_id: item_id.clone(),
            })?;
        }
        Ok(Self {
            source: DragSource {
                item_id,
                context_id,
                is_open_on_drag_start: is_open,
            },
            hover: None,
            timer: ExpandTimer::new(expand_delay),
            memo: None,
        })
    }

    pub fn source(&self) -> &DragSource {
        &self.source
    }

    /// Drop targets only accept rows dragged within the same tree view.
    pub fn can_drop(&self, context_id: Uuid) -> bool {
        self.source.context_id == context_id
    }

    pub fn hovered_target(&self) -> Option<&ItemId> {
        self.hover.as_ref().map(|h| &h.target)
    }

    /// Instruction currently shown on the hovered row.
    pub fn shown_instruction(&self) -> Option<&Instruction> {
        self.hover.as_ref().and_then(|h| h.shown.as_ref())
    }

    pub fn timer(&self) -> &ExpandTimer {
        &self.timer
    }

    /// Pointer moved over `target` and the collaborator classified it as
    /// `raw`. Returns the instruction to display, if any.
    pub fn hover(
        &mut self,
        store: &TreeStore,
        target: &ItemId,
        raw: Instruction,
        now: Instant,
    ) -> ApplicationResult<Option<Instruction>> {
        if self.hovered_target() != Some(target) {
            self.timer.cancel();
        }

        let resolution = self.interpret(store, target, &raw)?;
        let display = match &resolution {
            Resolution::Move(_) => raw.clone(),
            Resolution::Blocked(blocked) => blocked.clone(),
        };

        let shown = if target == &self.source.item_id {
            // Over its own row only an outdent makes sense.
            (display.desired().kind() == InstructionKind::Reparent).then_some(display)
        } else {
            self.update_timer(store, target, &display, now)?;
            Some(display)
        };

        self.hover = Some(Hover {
            target: target.clone(),
            raw,
            shown: shown.clone(),
        });
        Ok(shown)
    }

    /// Pointer left the hovered row.
    pub fn leave(&mut self) {
        self.timer.cancel();
        self.hover = None;
    }

    /// Fire the pending expand if it is due and still about the hovered row.
    pub fn poll(&mut self, store: &mut TreeStore, now: Instant) -> ApplicationResult<Option<ItemId>> {
        let Some(item_id) = self.timer.fire_due(now) else {
            return Ok(None);
        };
        if self.hovered_target() != Some(&item_id) {
            trace!(item = %item_id, "stale expand dropped");
            return Ok(None);
        }
        debug!(item = %item_id, "expanding hovered item");
        store.dispatch(TreeAction::Expand {
            item_id: item_id.clone(),
        })?;
        Ok(Some(item_id))
    }

    /// Row that would become the parent of the dragged item.
    pub fn highlighted_parent(&self, store: &TreeStore) -> ApplicationResult<Option<ItemId>> {
        let Some(Hover {
            target,
            shown: Some(instruction),
            ..
        }) = &self.hover
        else {
            return Ok(None);
        };
        Ok(store.queries().parent_of_instruction(target, instruction)?)
    }

    /// Commit the gesture. Dispatches the drop for the hovered row, then
    /// re-expands the dragged item if it was open when picked up.
    #[instrument(level = "debug", skip(self, store))]
    pub fn drop(mut self, store: &mut TreeStore) -> ApplicationResult<Dispatched> {
        self.timer.cancel();
        let outcome = match self.hover.take() {
            Some(Hover { target, raw, .. }) => store.dispatch(TreeAction::Instruction {
                instruction: raw,
                item_id: self.source.item_id.clone(),
                target_id: target,
            }),
            None => Ok(Dispatched::Unchanged),
        };

        if self.source.is_open_on_drag_start && store.queries().contains(&self.source.item_id) {
            store.dispatch(TreeAction::Expand {
                item_id: self.source.item_id.clone(),
            })?;
        }
        outcome
    }

    fn interpret(
        &mut self,
        store: &TreeStore,
        target: &ItemId,
        raw: &Instruction,
    ) -> ApplicationResult<Resolution> {
        let key = MemoKey {
            revision: store.revision(),
            dragged: self.source.item_id.clone(),
            target: target.clone(),
            raw: raw.clone(),
        };
        if let Some((cached_key, resolution)) = &self.memo {
            if cached_key == &key {
                return Ok(resolution.clone());
            }
        }
        let resolution = resolve(store.tree(), raw, &self.source.item_id, target)?;
        self.memo = Some((key, resolution.clone()));
        Ok(resolution)
    }

    fn update_timer(
        &mut self,
        store: &TreeStore,
        target: &ItemId,
        display: &Instruction,
        now: Instant,
    ) -> ApplicationResult<()> {
        if display.kind() != InstructionKind::MakeChild {
            self.timer.cancel();
            return Ok(());
        }
        let item = store.queries().item(target)?;
        if !item.is_leaf() && !item.is_open && !self.timer.is_pending() {
            self.timer.schedule(target.clone(), now);
        }
        Ok(())
    }
}
