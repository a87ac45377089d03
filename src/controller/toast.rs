//! Toast Notifications
//!
//! A single slot holding the current confirmation message. Each message owns
//! its dismissal timer; the timer is aborted when the message is replaced or
//! the slot is dropped, so no task outlives the dashboard.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default time a toast stays visible
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Aborts the wrapped task when dropped
#[derive(Debug)]
struct TimerGuard(JoinHandle<()>);

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// A visible toast as seen by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    /// Time left before the toast is dismissed
    pub remaining: Duration,
}

#[derive(Debug)]
struct ActiveToast {
    id: u64,
    message: String,
    shown_at: Instant,
    _timer: TimerGuard,
}

#[derive(Debug, Default)]
struct SlotInner {
    next_id: u64,
    active: Option<ActiveToast>,
}

/// Holder for at most one visible toast
#[derive(Debug, Clone)]
pub struct ToastSlot {
    inner: Arc<Mutex<SlotInner>>,
    duration: Duration,
}

impl Default for ToastSlot {
    fn default() -> Self {
        Self::new(TOAST_DURATION)
    }
}

impl ToastSlot {
    pub fn new(duration: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SlotInner::default())),
            duration,
        }
    }

    /// Show a message, replacing (and cancelling) any current one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;

        let weak: Weak<Mutex<SlotInner>> = Arc::downgrade(&self.inner);
        let duration = self.duration;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(inner) = weak.upgrade() {
                let expired = {
                    let mut inner = inner.lock();
                    match &inner.active {
                        Some(toast) if toast.id == id => inner.active.take(),
                        _ => None,
                    }
                };
                // Dropping the toast aborts this very task; do it outside the lock
                drop(expired);
                tracing::debug!(toast_id = id, "Toast dismissed");
            }
        });

        inner.active = Some(ActiveToast {
            id,
            message: message.into(),
            shown_at: Instant::now(),
            _timer: TimerGuard(handle),
        });
    }

    /// Toast currently visible, if any
    pub fn current(&self) -> Option<Toast> {
        self.inner.lock().active.as_ref().map(|toast| Toast {
            message: toast.message.clone(),
            remaining: self.duration.saturating_sub(toast.shown_at.elapsed()),
        })
    }
}
