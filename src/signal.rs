//! Cross-thread frame-ready notification.
//!
//! The engine announces new frames from its own internal thread; the host
//! paints on its UI thread. The two meet in a single coalescing flag: any
//! number of producer signals collapse into at most one observed update per
//! consumer clear, so redraw work stays bounded no matter how fast frames
//! arrive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::engine::UpdateFn;
use crate::host::RepaintScheduler;

pub struct UpdateSignal {
    /// The coalescing flag. A boolean, deliberately not a counter or queue.
    pending: AtomicBool,
    /// Host repaint scheduler; attached when the surface node comes up.
    scheduler: Mutex<Option<Arc<dyn RepaintScheduler>>>,
}

impl UpdateSignal {
    pub fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            scheduler: Mutex::new(None),
        }
    }

    /// Attach the host's thread-safe repaint scheduler. Paint thread only.
    pub fn attach_scheduler(&self, scheduler: Arc<dyn RepaintScheduler>) {
        if let Ok(mut slot) = self.scheduler.lock() {
            *slot = Some(scheduler);
        }
    }

    /// Drop the scheduler reference at surface teardown so late engine
    /// signals no longer reach the host.
    pub fn detach_scheduler(&self) {
        if let Ok(mut slot) = self.scheduler.lock() {
            *slot = None;
        }
    }

    /// Producer side. Runs on the engine's internal thread; sets the flag
    /// and asks the host for a repaint. Never touches graphics state and
    /// never panics, whatever the scheduler's state.
    pub fn notify(&self) {
        self.pending.store(true, Ordering::Release);

        let scheduler = match self.scheduler.lock() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        if let Some(scheduler) = scheduler {
            scheduler.schedule_repaint();
        }
    }

    /// Consumer side. Paint thread only: clears the flag and reports whether
    /// any producer signal arrived since the previous clear.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// True when a producer signal is pending, without consuming it.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Producer callback handed to the engine at context creation.
    pub fn producer_fn(self: &Arc<Self>) -> UpdateFn {
        let signal = Arc::clone(self);
        Arc::new(move || signal.notify())
    }
}

impl Default for UpdateSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    struct CountingScheduler {
        repaints: AtomicUsize,
    }

    impl CountingScheduler {
        fn new() -> Arc<Self> {
            Arc::new(Self { repaints: AtomicUsize::new(0) })
        }

        fn count(&self) -> usize {
            self.repaints.load(Ordering::SeqCst)
        }
    }

    impl RepaintScheduler for CountingScheduler {
        fn schedule_repaint(&self) {
            self.repaints.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn many_signals_coalesce_into_one_take() {
        for n in [1usize, 5, 1000] {
            let signal = UpdateSignal::new();
            for _ in 0..n {
                signal.notify();
            }
            assert!(signal.take(), "n = {n}");
            assert!(!signal.take(), "flag must be clear after one take, n = {n}");
        }
    }

    #[test]
    fn take_without_signal_reports_nothing() {
        let signal = UpdateSignal::new();
        assert!(!signal.take());
    }

    #[test]
    fn notify_requests_host_repaints() {
        let signal = UpdateSignal::new();
        let scheduler = CountingScheduler::new();
        signal.attach_scheduler(scheduler.clone());

        signal.notify();
        signal.notify();
        // The host may coalesce repaint requests further; the signal itself
        // forwards each one.
        assert_eq!(scheduler.count(), 2);

        signal.detach_scheduler();
        signal.notify();
        assert_eq!(scheduler.count(), 2);
    }

    #[test]
    fn producer_thread_signals_are_observed_once_per_take() {
        let signal = Arc::new(UpdateSignal::new());
        let producer_fn = signal.producer_fn();

        let producer = std::thread::spawn(move || {
            for _ in 0..1000 {
                producer_fn();
            }
        });
        producer.join().unwrap();

        assert!(signal.take());
        assert!(!signal.take());
    }
}
