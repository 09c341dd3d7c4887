//! Cancellable continuations for simulated processing.
//!
//! Every delayed mutation of a conversation runs as a task spawned through a
//! [`Scheduler`]. Each task receives a child of the scheduler's root
//! [`CancellationToken`], so tearing the owner down cancels every pending
//! continuation at once.
//!
//! Tasks must check their token after acquiring shared state and before
//! writing to it; a task that was cancelled while waiting for a lock must
//! not mutate anything.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Returned by [`delay`] when the token fired before the delay elapsed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("continuation cancelled")]
pub struct Cancelled;

/// Sleep for `duration`, returning early if `token` is cancelled.
pub async fn delay(token: &CancellationToken, duration: Duration) -> Result<(), Cancelled> {
    if token.is_cancelled() {
        return Err(Cancelled);
    }
    if duration.is_zero() {
        return Ok(());
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// Spawns continuations that share one cancellation scope.
///
/// Dropping the scheduler cancels everything it spawned.
#[derive(Debug, Default)]
pub struct Scheduler {
    root: CancellationToken,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            root: CancellationToken::new(),
        }
    }

    /// Spawn `task` on the tokio runtime with its own child token.
    ///
    /// The returned handle cancels only this task; [`shutdown`](Self::shutdown)
    /// cancels all of them.
    pub fn spawn<F, Fut>(&self, task: F) -> TaskHandle
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.root.child_token();
        let join = tokio::spawn(task(token.clone()));
        trace!("continuation scheduled");
        TaskHandle { token, join }
    }

    /// Cancel every continuation spawned by this scheduler.
    ///
    /// Tasks spawned afterwards start out cancelled.
    pub fn shutdown(&self) {
        if !self.root.is_cancelled() {
            trace!("scheduler shut down");
        }
        self.root.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

/// Handle to one scheduled continuation.
#[derive(Debug)]
pub struct TaskHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl TaskHandle {
    /// Request cancellation. The task stops at its next checkpoint.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the task has run to completion (or stopped after cancellation).
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the task to stop.
    ///
    /// A panic inside the task is logged and otherwise swallowed.
    pub async fn join(self) {
        if let Err(e) = self.join.await {
            tracing::warn!("continuation ended abnormally: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_delay_elapses_on_paused_clock() {
        let token = CancellationToken::new();
        let start = tokio::time::Instant::now();

        delay(&token, Duration::from_millis(1500)).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_returns_early_when_cancelled() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result = delay(&token, Duration::from_secs(60)).await;
        assert_eq!(result, Err(Cancelled));
    }

    #[tokio::test]
    async fn test_delay_on_cancelled_token_fails_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(delay(&token, Duration::ZERO).await, Err(Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_task_runs_to_completion() {
        let scheduler = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        let handle = scheduler.spawn(move |token| async move {
            if delay(&token, Duration::from_millis(100)).await.is_ok() {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });
        handle.join().await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_skips_its_body() {
        let scheduler = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        let handle = scheduler.spawn(move |token| async move {
            if delay(&token, Duration::from_secs(5)).await.is_ok() {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });
        handle.cancel();
        assert!(handle.is_cancelled());
        handle.join().await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_all_children() {
        let scheduler = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let c = Arc::clone(&counter);
                scheduler.spawn(move |token| async move {
                    if delay(&token, Duration::from_secs(1)).await.is_ok() {
                        c.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        scheduler.shutdown();
        assert!(scheduler.is_shut_down());
        for handle in handles {
            handle.join().await;
        }

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_scheduler_cancels_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        let handle = {
            let scheduler = Scheduler::new();
            scheduler.spawn(move |token| async move {
                if delay(&token, Duration::from_secs(1)).await.is_ok() {
                    c.fetch_add(1, Ordering::SeqCst);
                }
            })
        };
        handle.join().await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelling_one_task_leaves_siblings_running() {
        let scheduler = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&counter);
        let first = scheduler.spawn(move |token| async move {
            if delay(&token, Duration::from_millis(50)).await.is_ok() {
                c1.fetch_add(1, Ordering::SeqCst);
            }
        });
        let c2 = Arc::clone(&counter);
        let second = scheduler.spawn(move |token| async move {
            if delay(&token, Duration::from_millis(50)).await.is_ok() {
                c2.fetch_add(10, Ordering::SeqCst);
            }
        });

        first.cancel();
        first.join().await;
        second.join().await;

        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }
}
