//! User-facing notifications.
//!
//! The session hands every [`Notification`] to a [`NotificationSink`]. Delivery
//! is fire-and-forget: a sink cannot fail the operation that produced the
//! message.

use std::fmt;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

/// Where on screen the message should appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Center,
    Bottom,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub placement: Placement,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity, placement: Placement) -> Self {
        Self {
            message: message.into(),
            severity,
            placement,
        }
    }

    pub fn success(message: impl Into<String>, placement: Placement) -> Self {
        Self::new(message, Severity::Success, placement)
    }

    pub fn info(message: impl Into<String>, placement: Placement) -> Self {
        Self::new(message, Severity::Info, placement)
    }

    pub fn error(message: impl Into<String>, placement: Placement) -> Self {
        Self::new(message, Severity::Error, placement)
    }

    /// Warning listing products with negative stock, or `None` if there are none.
    #[must_use]
    pub fn negative_stock(names: &[String]) -> Option<Self> {
        if names.is_empty() {
            return None;
        }
        Some(Self::error(format!("Negative stock: {}", names.join(", ")), Placement::Top))
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Receiver of user-facing notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::warn!(placement = ?notification.placement, "{}", notification.message),
            Severity::Success | Severity::Info => {
                tracing::info!(placement = ?notification.placement, "{}", notification.message);
            }
        }
    }
}

/// Sink that prints to stdout and logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{notification}") {
            tracing::debug!(error = %e, "failed to print notification");
        }
        TracingSink.notify(notification);
    }
}

/// Sink that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears everything received so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Copy of everything received so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.received.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
