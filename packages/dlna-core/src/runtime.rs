//! Background worker pool.
//!
//! All network I/O (search rounds, description fetches, SOAP actions) runs on
//! tasks submitted through a [`TaskSpawner`]. The production [`WorkerPool`]
//! spawns onto a tokio runtime and stops accepting work once shut down.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

/// A boxed background task.
pub type BoxTask = BoxFuture<'static, ()>;

/// Abstraction for spawning background tasks.
///
/// Services hold an `Arc<dyn TaskSpawner>` and call its `spawn` helper;
/// tests substitute their own implementation.
pub trait TaskSpawner: Send + Sync {
    /// Submits a task. Returns `false` if the spawner no longer accepts work,
    /// in which case the task is dropped without running.
    fn spawn_task(&self, task: BoxTask) -> bool;

    /// Stops accepting new tasks. Tasks already running are left to finish.
    fn shutdown(&self);

    /// Whether new tasks are still accepted.
    fn is_accepting(&self) -> bool;
}

impl dyn TaskSpawner {
    /// Boxes and submits `future`.
    pub fn spawn<F>(&self, future: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn_task(future.boxed())
    }
}

/// Tokio-backed worker pool with unbounded concurrency.
pub struct WorkerPool {
    handle: Handle,
    tracker: TaskTracker,
    accepting: AtomicBool,
}

impl WorkerPool {
    /// Creates a pool spawning onto the given runtime handle.
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            tracker: TaskTracker::new(),
            accepting: AtomicBool::new(true),
        }
    }

    /// Creates a pool on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Number of tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Waits until the pool is shut down and every tracked task has finished.
    pub async fn wait_idle(&self) {
        self.tracker.wait().await;
    }
}

impl TaskSpawner for WorkerPool {
    fn spawn_task(&self, task: BoxTask) -> bool {
        if !self.accepting.load(Ordering::Acquire) {
            log::debug!("[WorkerPool] Rejected task after shutdown");
            return false;
        }
        self.tracker.spawn_on(task, &self.handle);
        true
    }

    fn shutdown(&self) {
        if self.accepting.swap(false, Ordering::AcqRel) {
            self.tracker.close();
            log::debug!(
                "[WorkerPool] Shut down with {} task(s) in flight",
                self.tracker.len()
            );
        }
    }

    fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[tokio::test]
    async fn pool_executes_task() {
        let pool: Arc<dyn TaskSpawner> = Arc::new(WorkerPool::current());
        let executed = Arc::new(AtomicBool::new(false));
        let executed_clone = executed.clone();

        assert!(pool.spawn(async move {
            executed_clone.store(true, Ordering::SeqCst);
        }));

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(executed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn pool_rejects_work_after_shutdown() {
        let pool = Arc::new(WorkerPool::current());
        let ran = Arc::new(AtomicUsize::new(0));
        let spawner: Arc<dyn TaskSpawner> = pool.clone();

        spawner.shutdown();
        let ran_clone = ran.clone();
        assert!(!spawner.spawn(async move {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(!spawner.is_accepting());

        pool.wait_idle().await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn shutdown_lets_in_flight_tasks_finish() {
        let pool = Arc::new(WorkerPool::current());
        let spawner: Arc<dyn TaskSpawner> = pool.clone();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let finished = Arc::new(AtomicBool::new(false));
        let finished_clone = finished.clone();

        spawner.spawn(async move {
            let _ = rx.await;
            finished_clone.store(true, Ordering::SeqCst);
        });
        spawner.shutdown();
        spawner.shutdown();
        let _ = tx.send(());

        pool.wait_idle().await;
        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(pool.in_flight(), 0);
    }
}
