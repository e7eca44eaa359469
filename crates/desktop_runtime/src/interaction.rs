//! Pointer-driven move/resize sessions shared by windows and widgets.
//!
//! An [`InteractionSession`] owns the global listeners installed for one drag. Ending the session,
//! or dropping it on any early-return path, runs every registered teardown and frees the single
//! active slot on its [`InteractionController`].

use std::{cell::RefCell, fmt, rc::Rc};

use thiserror::Error;

use crate::model::{PointerDelta, PointerPosition, ResizeEdge, WindowId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionTarget {
    Window(WindowId),
    Widget(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Move,
    Resize(ResizeEdge),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// Another drag or resize has not ended yet.
    #[error("an interaction is already active on {0:?}")]
    AlreadyActive(InteractionTarget),
}

#[derive(Debug, Default)]
struct ControllerSlot {
    active: Option<InteractionTarget>,
    attached_listeners: usize,
}

/// Hands out at most one [`InteractionSession`] at a time. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    slot: Rc<RefCell<ControllerSlot>>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session anchored at `pointer`; `on_delta` receives each non-zero incremental delta.
    pub fn begin(
        &self,
        target: InteractionTarget,
        kind: InteractionKind,
        pointer: PointerPosition,
        on_delta: impl FnMut(PointerDelta) + 'static,
    ) -> Result<InteractionSession, InteractionError> {
        let mut slot = self.slot.borrow_mut();
        if let Some(active) = &slot.active {
            return Err(InteractionError::AlreadyActive(active.clone()));
        }
        slot.active = Some(target.clone());
        Ok(InteractionSession {
            slot: self.slot.clone(),
            target,
            kind,
            last_pointer: pointer,
            on_delta: Box::new(on_delta),
            teardowns: Vec::new(),
            ended: false,
        })
    }

    pub fn active_target(&self) -> Option<InteractionTarget> {
        self.slot.borrow().active.clone()
    }

    pub fn is_active(&self) -> bool {
        self.slot.borrow().active.is_some()
    }

    /// Global listeners currently installed by live sessions.
    pub fn attached_listener_count(&self) -> usize {
        self.slot.borrow().attached_listeners
    }
}

/// One in-progress drag or resize.
pub struct InteractionSession {
    slot: Rc<RefCell<ControllerSlot>>,
    target: InteractionTarget,
    kind: InteractionKind,
    last_pointer: PointerPosition,
    on_delta: Box<dyn FnMut(PointerDelta)>,
    teardowns: Vec<Box<dyn FnOnce()>>,
    ended: bool,
}

impl InteractionSession {
    pub fn target(&self) -> &InteractionTarget {
        &self.target
    }

    pub fn kind(&self) -> InteractionKind {
        self.kind
    }

    /// Reports a pointer move. The delta is measured from the previous move, not the start.
    pub fn pointer_moved(&mut self, pointer: PointerPosition) -> PointerDelta {
        let delta = PointerDelta {
            dx: pointer.x - self.last_pointer.x,
            dy: pointer.y - self.last_pointer.y,
        };
        self.last_pointer = pointer;
        if !delta.is_zero() {
            (self.on_delta)(delta);
        }
        delta
    }

    /// Records a global listener; `teardown` detaches it when the session ends.
    pub fn register_listener(&mut self, teardown: impl FnOnce() + 'static) {
        self.slot.borrow_mut().attached_listeners += 1;
        self.teardowns.push(Box::new(teardown));
    }

    /// Ends the session, detaching every registered listener.
    pub fn end(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        for teardown in self.teardowns.drain(..) {
            teardown();
            let mut slot = self.slot.borrow_mut();
            slot.attached_listeners = slot.attached_listeners.saturating_sub(1);
        }
        self.slot.borrow_mut().active = None;
    }
}

impl Drop for InteractionSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for InteractionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionSession")
            .field("target", &self.target)
            .field("kind", &self.kind)
            .field("last_pointer", &self.last_pointer)
            .field("listeners", &self.teardowns.len())
            .finish_non_exhaustive()
    }
}
