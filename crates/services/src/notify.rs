//! Explicit toast channel handed to services instead of a global hook.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long a toast stays up unless the publisher says otherwise.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub duration: Duration,
}

type Subscriber = Arc<dyn Fn(&Toast) + Send + Sync>;

/// Publish/subscribe channel with at most one active subscriber.
///
/// Clones share the subscriber slot, so a UI can register once and every
/// service holding a clone reaches it.
#[derive(Clone, Default)]
pub struct Notifier {
    subscriber: Arc<Mutex<Option<Subscriber>>>,
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `callback`, replacing any previous subscriber.
    pub fn register(&self, callback: impl Fn(&Toast) + Send + Sync + 'static) {
        if let Ok(mut slot) = self.subscriber.lock() {
            *slot = Some(Arc::new(callback));
        }
    }

    pub fn unregister(&self) {
        if let Ok(mut slot) = self.subscriber.lock() {
            *slot = None;
        }
    }

    /// Deliver `toast`; returns false when nobody is listening.
    pub fn notify(&self, toast: &Toast) -> bool {
        // Clone out of the lock so a subscriber may call back into the notifier.
        let subscriber = match self.subscriber.lock() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        match subscriber {
            Some(callback) => {
                callback(toast);
                true
            }
            None => false,
        }
    }

    pub fn success(&self, message: impl Into<String>) -> bool {
        self.notify(&Toast {
            message: message.into(),
            kind: ToastKind::Success,
            duration: DEFAULT_TOAST_DURATION,
        })
    }

    pub fn error(&self, message: impl Into<String>) -> bool {
        self.notify(&Toast {
            message: message.into(),
            kind: ToastKind::Error,
            duration: DEFAULT_TOAST_DURATION,
        })
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered = self
            .subscriber
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false);
        f.debug_struct("Notifier")
            .field("registered", &registered)
            .finish()
    }
}
