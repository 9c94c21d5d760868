//! Cancellable trailing-edge debounce.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use log::warn;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const WAITING: u8 = 0;
const RUNNING: u8 = 1;
const CANCELLED: u8 = 2;

/// A scheduled task that is re-armed on every call.
///
/// Each [`call`](Debouncer::call) cancels the pending task (if it has not
/// started yet) and schedules the new one after the delay, so a burst of
/// calls runs only the last one. A task that has started always runs to
/// completion, and tasks never overlap: each one holds a shared lock while
/// it runs. Dropping the debouncer does not cancel a pending task; the
/// final state of a burst is still written.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Scheduled>,
    running: Arc<Mutex<()>>,
}

#[derive(Debug)]
struct Scheduled {
    handle: JoinHandle<()>,
    state: Arc<AtomicU8>,
}

impl Scheduled {
    /// Moves a waiting task to cancelled. Fails once it has started.
    fn cancel(&self) -> bool {
        let cancelled = self
            .state
            .compare_exchange(WAITING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if cancelled {
            self.handle.abort();
        }
        cancelled
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            running: Arc::new(Mutex::new(())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `task` to run after the delay, replacing any pending task.
    ///
    /// Needs a tokio runtime; without one the task is dropped.
    pub fn call<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let Ok(handle) = Handle::try_current() else {
            warn!("No async runtime, dropping debounced task");
            return;
        };
        let delay = self.delay;
        let state = Arc::new(AtomicU8::new(WAITING));
        let running = Arc::clone(&self.running);
        let task_state = Arc::clone(&state);
        let handle = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let _guard = running.lock().await;
            if task_state
                .compare_exchange(WAITING, RUNNING, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return;
            }
            task.await;
        });
        self.pending = Some(Scheduled { handle, state });
    }

    /// Cancel the pending task if it has not started. Returns `true` if one
    /// was cancelled. A task that already started keeps running.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some_and(|task| task.cancel())
    }

    /// Cancel the pending task if it has not started, then wait until no
    /// task is running. Returns `true` if a task was cancelled.
    pub async fn settle(&mut self) -> bool {
        let cancelled = self.cancel();
        drop(self.running.lock().await);
        cancelled
    }

    /// Returns `true` while a scheduled task has not finished.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }
}
