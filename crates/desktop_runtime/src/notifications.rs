//! In-shell notification queue backing the toast stack and the taskbar badge.

/// Toasts kept at once; older entries are dropped first.
pub const MAX_NOTIFICATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Severity shown on a toast.
pub enum NotificationLevel {
    /// Informational message.
    Info,
    /// Rejected user action.
    Warning,
    /// Failed background work.
    Error,
}

impl NotificationLevel {
    /// CSS modifier for the toast element.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Info => "toast info",
            Self::Warning => "toast warning",
            Self::Error => "toast error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single toast.
pub struct Notification {
    /// Queue-unique id used for dismissal.
    pub id: u64,
    pub level: NotificationLevel,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Bounded, ordered queue of undismissed notifications.
pub struct NotificationCenter {
    entries: Vec<Notification>,
    next_id: u64,
}

impl NotificationCenter {
    /// Appends a notification and returns its id.
    pub fn push(
        &mut self,
        level: NotificationLevel,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> u64 {
        self.next_id = self.next_id.saturating_add(1);
        let id = self.next_id;
        self.entries.push(Notification {
            id,
            level,
            title: title.into(),
            body: body.into(),
        });
        if self.entries.len() > MAX_NOTIFICATIONS {
            let overflow = self.entries.len() - MAX_NOTIFICATIONS;
            self.entries.drain(..overflow);
        }
        id
    }

    /// Removes a notification; unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Oldest first.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn push_assigns_increasing_ids_and_keeps_order() {
        let mut center = NotificationCenter::default();
        let first = center.push(NotificationLevel::Info, "Desktop", "ready");
        let second = center.push(NotificationLevel::Error, "Chess", "manifest missing");

        assert!(second > first);
        let titles: Vec<_> = center.entries().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Desktop", "Chess"]);
    }

    #[test]
    fn queue_drops_oldest_beyond_capacity() {
        let mut center = NotificationCenter::default();
        for n in 0..MAX_NOTIFICATIONS + 2 {
            center.push(NotificationLevel::Warning, format!("t{n}"), "");
        }

        assert_eq!(center.len(), MAX_NOTIFICATIONS);
        assert_eq!(center.entries()[0].title, "t2");
    }

    #[test]
    fn dismiss_removes_only_the_matching_entry() {
        let mut center = NotificationCenter::default();
        let keep = center.push(NotificationLevel::Info, "a", "");
        let drop = center.push(NotificationLevel::Info, "b", "");

        assert!(center.dismiss(drop));
        assert!(!center.dismiss(drop));
        assert_eq!(center.entries().len(), 1);
        assert_eq!(center.entries()[0].id, keep);

        center.clear();
        assert!(center.is_empty());
    }
}
