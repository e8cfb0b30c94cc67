use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// A single cancellation flag shared between the two pump threads and the
/// caller, generalising the `Arc<AtomicBool>` "reset" flag plus its
/// accompanying `Condvar` that the teacher wires up per-stream.
///
/// `close()` on a [`crate::Tc`] cancels the token, which wakes every thread
/// parked in [`CancellationToken::sleep`] on its next scheduling point — no
/// pump ever has to hold `Shared`'s lock across a blocking substrate I/O call
/// to notice cancellation.
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    gate: Arc<(Mutex<()>, Condvar)>,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken {
            cancelled: Arc::new(AtomicBool::new(false)),
            gate: Arc::new((Mutex::new(()), Condvar::new())),
        }
    }

    /// Derives a child token tied to the lifetime of `self`: cancelling the
    /// parent does not automatically cancel the child (the engine owns
    /// exactly one token for its own lifetime), but a caller who wants a
    /// parent-scoped shutdown can hold both and cancel in lockstep.
    pub fn child(&self) -> Self {
        self.clone()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        let (_lock, cvar) = &*self.gate;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Sleeps for `dur` unless cancelled first, in which case it returns early.
    pub fn sleep(&self, dur: Duration) {
        let (lock, cvar) = &*self.gate;
        let guard = lock.lock().unwrap();
        let _ = cvar
            .wait_timeout_while(guard, dur, |_| !self.is_cancelled())
            .unwrap();
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn cancel_wakes_a_sleeping_thread_immediately() {
        let token = CancellationToken::new();
        let waiter = token.clone();

        let handle = thread::spawn(move || {
            let start = Instant::now();
            waiter.sleep(Duration::from_secs(10));
            start.elapsed()
        });

        thread::sleep(Duration::from_millis(20));
        token.cancel();

        let elapsed = handle.join().unwrap();
        assert!(elapsed < Duration::from_secs(1));
        assert!(token.is_cancelled());
    }

    #[test]
    fn sleep_without_cancellation_runs_the_full_duration() {
        let token = CancellationToken::new();
        let start = Instant::now();
        token.sleep(Duration::from_millis(30));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
