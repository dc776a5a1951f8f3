//! Injectable repeating-timer capability.
//!
//! The playback controller never owns a clock; whoever hosts it supplies a
//! scheduler. That keeps the sleep-timer countdown and the fade ramp testable
//! without waiting real time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Cancellation handle for a scheduled repeating callback.
#[derive(Clone, Debug, Default)]
pub struct ScheduleHandle {
    cancelled: Arc<AtomicBool>,
}

impl ScheduleHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

pub trait Scheduler: Send + Sync {
    /// Invoke `callback` every `interval` until the returned handle is
    /// cancelled. The first invocation happens one full interval after the
    /// call, never synchronously within it.
    fn schedule_repeating(
        &self,
        interval: Duration,
        callback: Box<dyn FnMut() + Send>,
    ) -> ScheduleHandle;
}

/// Scheduler backed by one thread per scheduled callback.
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn schedule_repeating(
        &self,
        interval: Duration,
        mut callback: Box<dyn FnMut() + Send>,
    ) -> ScheduleHandle {
        let handle = ScheduleHandle::new();
        let token = handle.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(interval);
                if token.is_cancelled() {
                    break;
                }
                callback();
            }
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::{ScheduleHandle, Scheduler, ThreadScheduler};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn handle_starts_live_and_stays_cancelled() {
        let handle = ScheduleHandle::new();
        assert!(!handle.is_cancelled());
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn thread_scheduler_fires_until_cancelled() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let handle = ThreadScheduler.schedule_repeating(
            Duration::from_millis(5),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        thread::sleep(Duration::from_millis(100));
        assert!(fired.load(Ordering::SeqCst) >= 2, "ticker never fired");

        handle.cancel();
        thread::sleep(Duration::from_millis(20));
        let after_cancel = fired.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        // one in-flight tick may land, but the ticker must be dead after it
        assert!(fired.load(Ordering::SeqCst) <= after_cancel + 1);
    }
}
