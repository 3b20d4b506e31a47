use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::orchestrator::SyncOrchestrator;

/// Drives [`SyncOrchestrator::tick`] from a background thread.
///
/// Dropping the ticker stops the thread and waits for it; a cycle that is
/// already running finishes first.
pub struct SyncTicker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SyncTicker {
    pub fn spawn(orchestrator: Arc<SyncOrchestrator>, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !flag.load(Ordering::Acquire) {
                if orchestrator.is_stopped() {
                    break;
                }
                orchestrator.tick();
                thread::park_timeout(interval);
            }
            tracing::debug!("sync ticker stopped");
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the thread and wait for it.
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                tracing::error!("sync ticker thread panicked");
            }
        }
    }
}

impl Drop for SyncTicker {
    fn drop(&mut self) {
        self.halt();
    }
}
