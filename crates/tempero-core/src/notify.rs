//! Outcome notifications
//!
//! The core reports what happened (saved, failed, nothing selected, ...) through
//! a [`Notifier`] and leaves rendering to the front-end.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Success => write!(f, "success"),
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }
}

/// Sink for outcome notifications
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Writes notifications to the `tracing` log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success | Level::Info => tracing::info!(kind = %notification.level, "{}", notification.message),
            Level::Warning => tracing::warn!("{}", notification.message),
            Level::Error => tracing::error!("{}", notification.message),
        }
    }
}

/// Holds only the most recent notification; each write replaces the previous one
#[derive(Debug, Default)]
pub struct Outbox {
    latest: Mutex<Option<Notification>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Notification> {
        self.latest.lock().ok().and_then(|slot| slot.clone())
    }

    /// Remove and return the current notification, e.g. once it was shown
    pub fn take(&self) -> Option<Notification> {
        self.latest.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl Notifier for Outbox {
    fn notify(&self, notification: Notification) {
        if let Ok(mut slot) = self.latest.lock() {
            *slot = Some(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbox_keeps_latest() {
        let outbox = Outbox::new();
        assert_eq!(outbox.latest(), None);

        outbox.notify(Notification::success("saved"));
        outbox.notify(Notification::error("failed"));

        assert_eq!(outbox.latest(), Some(Notification::error("failed")));
    }

    #[test]
    fn test_outbox_take_clears() {
        let outbox = Outbox::new();
        outbox.notify(Notification::info("loaded"));

        assert_eq!(outbox.take(), Some(Notification::info("loaded")));
        assert_eq!(outbox.latest(), None);
    }

    #[test]
    fn test_notifier_by_reference() {
        fn report(notifier: impl Notifier) {
            notifier.notify(Notification::warning("check stock"));
        }

        let outbox = Outbox::new();
        report(&outbox);
        assert_eq!(outbox.latest().map(|n| n.level), Some(Level::Warning));
    }
}
