//! Notification Sink
//!
//! Transient success/warning/error messages shown to the shopper. Delivery is
//! fire-and-forget: sinks never report back.

use serde::Serialize;
use std::sync::Mutex;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

/// A message for the shopper
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }

    fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Anything that can surface a notification to the shopper
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        let Notification {
            kind,
            title,
            message,
        } = notification;
        match kind {
            NotificationKind::Success => tracing::info!(%title, %message, "notification"),
            NotificationKind::Warning => tracing::warn!(%title, %message, "notification"),
            NotificationKind::Error => tracing::error!(%title, %message, "notification"),
        }
    }
}

/// Keeps every notification in memory, in emission order.
///
/// The HTTP layer uses one per request to hand the produced notification
/// back to the page.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything recorded so far
    pub fn take(&self) -> Vec<Notification> {
        match self.received.lock() {
            Ok(mut received) => std::mem::take(&mut *received),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.received.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        match self.received.lock() {
            Ok(mut received) => received.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

/// Sends each notification to two sinks
pub struct Tee<'a> {
    first: &'a dyn NotificationSink,
    second: &'a dyn NotificationSink,
}

impl<'a> Tee<'a> {
    pub fn new(first: &'a dyn NotificationSink, second: &'a dyn NotificationSink) -> Self {
        Self { first, second }
    }
}

impl NotificationSink for Tee<'_> {
    fn notify(&self, notification: Notification) {
        self.first.notify(notification.clone());
        self.second.notify(notification);
    }
}
