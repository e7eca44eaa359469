//! Process-wide signal channel for decoupled window open/close requests.
//!
//! Launchers, the taskbar, and embedded apps publish [`BridgeSignal`] values without holding a
//! reference to the desktop state. Delivery is synchronous and limited to listeners subscribed at
//! publish time.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    rc::{Rc, Weak},
};

use crate::{model::UrlWindowSpec, reducer::DesktopAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeSignal {
    /// Open a registry app with its default geometry and content.
    OpenWindowByApp(String),
    /// Open a fully described embedded-frame window.
    OpenWindowByUrl(UrlWindowSpec),
    /// Close every window whose id, app, or title matches the tag.
    CloseWindowByTag(String),
    /// Filesystem listings changed. Re-broadcast only.
    FsChange,
}

impl BridgeSignal {
    /// Stable wire name of the signal.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenWindowByApp(_) => "open-window-by-app",
            Self::OpenWindowByUrl(_) => "open-window-by-url",
            Self::CloseWindowByTag(_) => "close-window-by-tag",
            Self::FsChange => "fs-change",
        }
    }
}

type Listener = Rc<dyn Fn(&BridgeSignal)>;

#[derive(Default)]
struct BridgeListeners {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

/// Single-threaded publish/subscribe hub. Clones share the same listener set.
#[derive(Clone, Default)]
pub struct EventBridge {
    inner: Rc<RefCell<BridgeListeners>>,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` until the returned guard is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&BridgeSignal) + 'static) -> BridgeSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, Rc::new(listener));
        BridgeSubscription {
            bridge: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Delivers `signal` to every current listener and returns how many received it.
    ///
    /// Listeners may publish or (un)subscribe re-entrantly; changes apply to later publishes.
    pub fn publish(&self, signal: &BridgeSignal) -> usize {
        let listeners: Vec<Listener> = self.inner.borrow().listeners.values().cloned().collect();
        for listener in &listeners {
            listener(signal);
        }
        listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Guard returned by [`EventBridge::subscribe`].
#[derive(Debug)]
pub struct BridgeSubscription {
    bridge: Weak<RefCell<BridgeListeners>>,
    id: u64,
}

impl BridgeSubscription {
    pub fn unsubscribe(self) {}
}

impl Drop for BridgeSubscription {
    fn drop(&mut self) {
        if let Some(bridge) = self.bridge.upgrade() {
            bridge.borrow_mut().listeners.remove(&self.id);
        }
    }
}

/// Maps a signal to the reducer action the window manager applies for it.
pub fn bridge_action(signal: &BridgeSignal) -> Option<DesktopAction> {
    match signal {
        BridgeSignal::OpenWindowByApp(app_id) => Some(DesktopAction::OpenApp {
            app_id: app_id.clone(),
        }),
        BridgeSignal::OpenWindowByUrl(spec) => Some(DesktopAction::OpenUrlWindow(spec.clone())),
        BridgeSignal::CloseWindowByTag(tag) => Some(DesktopAction::CloseWindowsByTag {
            tag: tag.clone(),
        }),
        BridgeSignal::FsChange => None,
    }
}
