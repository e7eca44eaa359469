//! Per-window containment for content factories.
//!
//! A factory that returns an error or panics puts only its own window into a terminal failed
//! state. The window stays in the store and can still be closed.

use std::{
    collections::BTreeMap,
    panic::{catch_unwind, AssertUnwindSafe},
};

use leptos::logging;
use thiserror::Error;

use crate::{
    content::{ContentFactory, WindowContent},
    model::{WindowId, WindowRecord},
};

/// Message shown in place of crashed window content.
pub const CRASHED_WINDOW_MESSAGE: &str = "App crashed. Please close this window.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisedContent {
    Ready(WindowContent),
    Failed(String),
}

/// Failure raised into the window's error boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("window content crashed: {0}")]
pub struct ContentCrash(pub String);

impl SupervisedContent {
    pub fn into_result(self) -> Result<WindowContent, ContentCrash> {
        match self {
            Self::Ready(content) => Ok(content),
            Self::Failed(reason) => Err(ContentCrash(reason)),
        }
    }
}

/// Runs `factory`, converting errors and panics into [`SupervisedContent::Failed`].
pub fn supervise(factory: &ContentFactory) -> SupervisedContent {
    match catch_unwind(AssertUnwindSafe(|| factory.produce())) {
        Ok(Ok(content)) => SupervisedContent::Ready(content),
        Ok(Err(err)) => SupervisedContent::Failed(err.to_string()),
        Err(payload) => SupervisedContent::Failed(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "content panicked".to_string()
    }
}

/// Remembers which windows have crashed. Failure is terminal for the window's lifetime.
#[derive(Debug, Clone, Default)]
pub struct SupervisionLedger {
    failures: BTreeMap<WindowId, String>,
}

impl SupervisionLedger {
    /// Produces content for `window`, short-circuiting windows that already failed.
    pub fn content_for(&mut self, window: &WindowRecord) -> SupervisedContent {
        if let Some(reason) = self.failures.get(&window.id) {
            return SupervisedContent::Failed(reason.clone());
        }
        let outcome = match &window.content {
            Some(factory) => supervise(factory),
            None => SupervisedContent::Ready(WindowContent::Unavailable {
                title: window.title.clone(),
            }),
        };
        if let SupervisedContent::Failed(reason) = &outcome {
            logging::warn!("window `{}` content failed: {reason}", window.id);
            self.failures.insert(window.id.clone(), reason.clone());
        }
        outcome
    }

    pub fn failure(&self, window_id: &WindowId) -> Option<&str> {
        self.failures.get(window_id).map(String::as_str)
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// Drops entries for windows that are no longer open.
    pub fn sync_windows(&mut self, windows: &[WindowRecord]) {
        self.failures
            .retain(|id, _| windows.iter().any(|window| &window.id == id));
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{apps::bootstrap_window, content::ContentError};

    fn with_content(id: &str, factory: ContentFactory) -> WindowRecord {
        WindowRecord {
            id: WindowId::new(id),
            content: Some(factory),
            ..bootstrap_window()
        }
    }

    #[test]
    fn failed_content_surfaces_as_a_boundary_error() {
        let panicking = ContentFactory::from_fn(|| panic!("render exploded"));
        assert_eq!(
            supervise(&panicking).into_result(),
            Err(ContentCrash("render exploded".to_string()))
        );
        assert_eq!(
            ContentCrash("render exploded".to_string()).to_string(),
            "window content crashed: render exploded"
        );

        let healthy = ContentFactory::from_fn(|| {
            Ok(WindowContent::App {
                app_id: "explorer".to_string(),
            })
        });
        assert_eq!(
            supervise(&healthy).into_result(),
            Ok(WindowContent::App {
                app_id: "explorer".to_string()
            })
        );
    }

    #[test]
    fn errors_and_panics_are_contained() {
        let failing = ContentFactory::from_fn(|| Err(ContentError::Failed("boom".to_string())));
        assert_eq!(
            supervise(&failing),
            SupervisedContent::Failed("content failed: boom".to_string())
        );

        let panicking = ContentFactory::from_fn(|| panic!("render exploded"));
        assert_eq!(
            supervise(&panicking),
            SupervisedContent::Failed("render exploded".to_string())
        );

        assert_eq!(
            supervise(&ContentFactory::app("terminal")),
            SupervisedContent::Ready(WindowContent::App {
                app_id: "terminal".to_string()
            })
        );
    }

    #[test]
    fn one_crashing_window_does_not_affect_siblings_and_stays_failed() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let crashing = with_content(
            "crashy-1",
            ContentFactory::from_fn(move || {
                counter.set(counter.get() + 1);
                panic!("crash #{}", counter.get())
            }),
        );
        let healthy = with_content("terminal-1", ContentFactory::app("terminal"));
        let mut ledger = SupervisionLedger::default();

        assert_eq!(
            ledger.content_for(&crashing),
            SupervisedContent::Failed("crash #1".to_string())
        );
        assert!(matches!(
            ledger.content_for(&healthy),
            SupervisedContent::Ready(_)
        ));
        assert_eq!(
            ledger.content_for(&crashing),
            SupervisedContent::Failed("crash #1".to_string())
        );
        assert_eq!(calls.get(), 1);
        assert_eq!(ledger.failure(&healthy.id), None);
    }

    #[test]
    fn sync_forgets_closed_windows() {
        let crashing = with_content(
            "crashy-1",
            ContentFactory::from_fn(|| Err(ContentError::AppUnavailable("crashy".to_string()))),
        );
        let mut ledger = SupervisionLedger::default();
        ledger.content_for(&crashing);
        assert_eq!(ledger.failed_count(), 1);

        ledger.sync_windows(&[crashing.clone()]);
        assert_eq!(ledger.failed_count(), 1);
        ledger.sync_windows(&[]);
        assert_eq!(ledger.failed_count(), 0);
    }
}
