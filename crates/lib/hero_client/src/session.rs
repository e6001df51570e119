// @zen-component: SES-SessionTimer
//
//! Inactivity session timer.
//!
//! Counts down once per second on a background task. Activity resets the
//! counter without touching the task; reaching zero fires the expiry hook
//! exactly once so the owner can force a logout.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Session lifecycle notifications emitted by the token store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The inactivity limit was reached; the store has already been
    /// force-logged-out (a `LoggedOut` precedes this event). Hosts should
    /// navigate to their login view.
    Expired,
    /// The session ended, explicitly or forcibly.
    LoggedOut,
}

/// One-second countdown with restart, reset and idempotent stop.
pub struct SessionTimer {
    shared: Arc<TimerShared>,
}

struct TimerShared {
    duration_secs: i64,
    remaining: AtomicI64,
    /// Bumped on every start/stop. A countdown task may only clear the task
    /// slot and fire its expiry hook while its epoch is still current, so a
    /// superseded task can neither cancel nor expire its successor.
    epoch: AtomicU64,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionTimer {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            shared: Arc::new(TimerShared {
                duration_secs: duration_secs as i64,
                remaining: AtomicI64::new(duration_secs as i64),
                epoch: AtomicU64::new(0),
                task: Mutex::new(None),
            }),
        }
    }

    // @zen-impl: SES-1_AC-1
    /// Start (or restart) the countdown. Any previous countdown is
    /// cancelled; `on_expiry` runs exactly once if this countdown reaches
    /// zero.
    pub fn start<F>(&self, on_expiry: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut task = lock_task(&self.shared);
        if let Some(previous) = task.take() {
            previous.abort();
        }
        let epoch = self.shared.epoch.fetch_add(1, Ordering::Relaxed) + 1;
        self.shared
            .remaining
            .store(self.shared.duration_secs, Ordering::Relaxed);
        *task = Some(tokio::spawn(run_countdown(
            Arc::clone(&self.shared),
            epoch,
            on_expiry,
        )));
    }

    // @zen-impl: SES-1_AC-2
    /// Push the deadline back to the full duration. The ticking task keeps
    /// running; calling this on a stopped timer only moves the counter.
    pub fn reset(&self) {
        self.shared
            .remaining
            .store(self.shared.duration_secs, Ordering::Relaxed);
    }

    // @zen-impl: SES-2_AC-2
    /// Cancel the countdown. Safe to call repeatedly or before any start.
    pub fn stop(&self) {
        let mut task = lock_task(&self.shared);
        self.shared.epoch.fetch_add(1, Ordering::Relaxed);
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }

    /// Seconds left before the session expires (never negative).
    pub fn remaining_seconds(&self) -> i64 {
        self.shared.remaining.load(Ordering::Relaxed).max(0)
    }

    /// Whether a countdown task is currently live.
    pub fn is_running(&self) -> bool {
        lock_task(&self.shared)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

// @zen-impl: SES-2_AC-1
async fn run_countdown<F>(shared: Arc<TimerShared>, epoch: u64, on_expiry: F)
where
    F: FnOnce() + Send + 'static,
{
    let mut ticks = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately; consume it so the countdown
    // starts a full second out.
    ticks.tick().await;
    loop {
        ticks.tick().await;
        let left = shared.remaining.fetch_sub(1, Ordering::Relaxed) - 1;
        if left <= 0 {
            break;
        }
    }
    let current = {
        let mut task = lock_task(&shared);
        if shared.epoch.load(Ordering::Relaxed) == epoch {
            *task = None;
            true
        } else {
            false
        }
    };
    if current {
        on_expiry();
    }
}

fn lock_task(shared: &TimerShared) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
    shared
        .task
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
