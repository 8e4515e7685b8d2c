//! Single-slot user notification channel.
//!
//! Store operations push a message here after deciding success or failure.
//! The consumer shows it, then dismisses it explicitly or lets it expire.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How long a notification stays visible unless dismissed earlier
pub const DEFAULT_DISPLAY_SECS: i64 = 4;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Error,
    Success,
    Warning,
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationKind::Error => "error",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        };
        f.write_str(s)
    }
}

/// A pending message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: DateTime<Utc>,
}

/// Holds at most one pending notification
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    pending: Option<Notification>,
    display_for: Duration,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::with_display_duration(Duration::seconds(DEFAULT_DISPLAY_SECS))
    }

    pub fn with_display_duration(display_for: Duration) -> Self {
        Self {
            pending: None,
            display_for,
        }
    }

    /// Replace any pending message
    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.show_at(message, kind, Utc::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, kind: NotificationKind, now: DateTime<Utc>) {
        let message = message.into();
        tracing::trace!(%kind, %message, "notification");
        self.pending = Some(Notification {
            message,
            kind,
            shown_at: now,
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, NotificationKind::Error);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, NotificationKind::Success);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.show(message, NotificationKind::Info);
    }

    /// Peek at the pending message
    pub fn current(&self) -> Option<&Notification> {
        self.pending.as_ref()
    }

    /// Clear the pending message, returning it
    pub fn dismiss(&mut self) -> Option<Notification> {
        self.pending.take()
    }

    /// Clear the pending message once its display time has elapsed.
    /// Returns true when a message was cleared.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        let expired = self
            .pending
            .as_ref()
            .is_some_and(|n| now - n.shown_at >= self.display_for);
        if expired {
            self.pending = None;
        }
        expired
    }

    pub fn display_duration(&self) -> Duration {
        self.display_for
    }
}
