use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use tracing::info;

/// Stop flag shared by the tick loop, Ctrl+C and the keyboard monitor.
///
/// Sleeping through [`ShutdownSignal::wait`] instead of `thread::sleep()`
/// lets a quit request end the current wait immediately.
pub struct ShutdownSignal {
    triggered: AtomicBool,
    condvar: Condvar,
    mutex: Mutex<()>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            triggered: AtomicBool::new(false),
            condvar: Condvar::new(),
            mutex: Mutex::new(()),
        }
    }

    /// Trigger the signal on Ctrl+C
    pub fn install_ctrlc_handler(self: &Arc<Self>) -> Result<(), ctrlc::Error> {
        let signal = Arc::clone(self);
        ctrlc::set_handler(move || {
            info!("Received Ctrl+C, stopping...");
            signal.trigger();
        })
    }

    /// Set the flag and wake every waiter
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        self.condvar.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` unless triggered first.
    ///
    /// Returns `true` if the wait ended because of a shutdown.
    pub fn wait(&self, duration: Duration) -> bool {
        if self.is_shutdown() {
            return true;
        }

        let Ok(guard) = self.mutex.lock() else {
            return true;
        };
        match self
            .condvar
            .wait_timeout_while(guard, duration, |_| !self.is_shutdown())
        {
            Ok((_, timeout)) => !timeout.timed_out(),
            // Poisoned mutex
            Err(_) => true,
        }
    }
}

impl Default for ShutdownSignal {
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
    fn test_trigger() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_shutdown());
        signal.trigger();
        assert!(signal.is_shutdown());
    }

    #[test]
    fn test_wait_runs_to_timeout() {
        let signal = ShutdownSignal::new();
        let start = Instant::now();

        assert!(!signal.wait(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_wait_is_interrupted() {
        let signal = Arc::new(ShutdownSignal::new());
        let waiter = Arc::clone(&signal);

        let handle = thread::spawn(move || {
            let start = Instant::now();
            (waiter.wait(Duration::from_secs(10)), start.elapsed())
        });

        thread::sleep(Duration::from_millis(50));
        signal.trigger();

        let (interrupted, elapsed) = handle.join().unwrap();
        assert!(interrupted);
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_after_trigger_returns_immediately() {
        let signal = ShutdownSignal::new();
        signal.trigger();

        let start = Instant::now();
        assert!(signal.wait(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
