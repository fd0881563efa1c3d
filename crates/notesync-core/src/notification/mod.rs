//! Transient user-facing messages with an auto-clear deadline.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(5000);

/// Holds at most one message at a time.
///
/// Every [`show`](Self::show) restarts the deadline and cancels the one
/// belonging to the previous message, so a message is only ever cleared by its
/// own timer or by [`clear`](Self::clear). Clones share the same state.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    timeout: Duration,
    message: watch::Sender<Option<String>>,
    schedule: Mutex<ClearSchedule>,
}

#[derive(Debug, Default)]
struct ClearSchedule {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl ClearSchedule {
    fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TIMEOUT)
    }
}

impl NotificationCenter {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let (message, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                timeout,
                message,
                schedule: Mutex::new(ClearSchedule::default()),
            }),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// Display `message` and schedule it to clear after the timeout.
    ///
    /// Outside a tokio runtime the message is shown without a deadline.
    pub fn show(&self, message: impl Into<String>) {
        let message = message.into();
        let mut schedule = self.inner.schedule();
        schedule.cancel();
        schedule.generation = schedule.generation.wrapping_add(1);
        let generation = schedule.generation;

        tracing::debug!(message = %message, "Showing notification");
        self.inner.message.send_replace(Some(message));

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let inner = Arc::clone(&self.inner);
                schedule.pending = Some(runtime.spawn(async move {
                    tokio::time::sleep(inner.timeout).await;
                    inner.expire(generation);
                }));
            }
            Err(_) => {
                tracing::warn!("No async runtime available; notification will not auto-clear");
            }
        }
    }

    /// Remove the active message now and drop its pending deadline.
    pub fn clear(&self) {
        let mut schedule = self.inner.schedule();
        schedule.cancel();
        schedule.generation = schedule.generation.wrapping_add(1);
        self.inner.clear_message();
    }

    pub fn current(&self) -> Option<String> {
        self.inner.message.borrow().clone()
    }

    /// Watch the active message; the receiver sees every show and clear.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.inner.message.subscribe()
    }
}

impl Inner {
    fn schedule(&self) -> MutexGuard<'_, ClearSchedule> {
        self.schedule.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn expire(&self, generation: u64) {
        let mut schedule = self.schedule();
        if schedule.generation != generation {
            return;
        }
        schedule.pending = None;
        self.clear_message();
    }

    fn clear_message(&self) {
        self.message.send_if_modified(|message| message.take().is_some());
    }
}
