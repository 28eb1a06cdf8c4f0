//! Read/write diagnostics.
//!
//! Non-fatal issues met while reading or writing are collected as
//! `Notification` items instead of being silently dropped or escalated to
//! hard errors. Skipping an unsupported construct is a first-class event:
//! after an operation the caller can ask the collection how much of the
//! file was not carried into the neutral model.

use std::fmt;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A construct the model does not preserve was skipped.
    Skipped,
    /// Non-fatal oddity (duplicate name, missing handle, clamped value).
    Warning,
    /// An error that was recovered from.
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => write!(f, "Skipped"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single notification produced during reading or writing.
#[derive(Debug, Clone)]
pub struct Notification {
    /// The category.
    pub notification_type: NotificationType,
    /// Human-readable description.
    pub message: String,
}

impl Notification {
    /// Create a new notification.
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}

/// Collects notifications during a read/write operation.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification.
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        self.items.push(Notification::new(notification_type, message));
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of skipped constructs.
    pub fn skipped_count(&self) -> usize {
        self.items
            .iter()
            .filter(|n| n.notification_type == NotificationType::Skipped)
            .count()
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Check whether any notification of the given type exists.
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_counting() {
        let mut c = NotificationCollection::new();
        c.notify(NotificationType::Skipped, "UCS table entry");
        c.notify(NotificationType::Warning, "duplicate layer 'WALLS'");
        c.notify(NotificationType::Skipped, "HATCH loop detail");

        assert_eq!(c.len(), 3);
        assert_eq!(c.skipped_count(), 2);
        assert!(c.has_type(NotificationType::Warning));
        assert!(!c.has_type(NotificationType::Error));
    }

    #[test]
    fn test_display() {
        let n = Notification::new(NotificationType::Skipped, "plot settings");
        assert_eq!(format!("{}", n), "[Skipped] plot settings");
    }
}
