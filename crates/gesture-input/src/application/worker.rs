//! Bounded background execution for input actions.
//!
//! A click holds the button for tens of milliseconds, a key combo about as
//! long and a double click well over a hundred, so the facade hands them to
//! this pool instead of blocking the request thread.  The driver call itself is synchronous and may
//! sleep, which is why each job runs under `spawn_blocking`; a semaphore caps
//! how many run at once.
//!
//! There is no cancellation.  Dropping an [`ActionHandle`] detaches the job,
//! which still runs to completion.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use gesture_core::InputResult;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::error;

/// Default bound on concurrently executing action jobs.
pub const DEFAULT_WORKER_THREADS: usize = 4;

/// Awaitable outcome of a submitted action.
///
/// Resolves immediately when the action never reached the pool (for example a
/// cooldown suppression), otherwise when the background job finishes.
#[derive(Debug)]
pub struct ActionHandle {
    state: HandleState,
}

#[derive(Debug)]
enum HandleState {
    Ready(Option<InputResult>),
    Pending(JoinHandle<InputResult>),
}

impl ActionHandle {
    /// A handle that is already resolved.
    pub fn ready(result: InputResult) -> Self {
        Self {
            state: HandleState::Ready(Some(result)),
        }
    }

    fn pending(join: JoinHandle<InputResult>) -> Self {
        Self {
            state: HandleState::Pending(join),
        }
    }

    /// Returns `true` when the result is available without waiting.
    pub fn is_finished(&self) -> bool {
        match &self.state {
            HandleState::Ready(_) => true,
            HandleState::Pending(join) => join.is_finished(),
        }
    }
}

impl Future for ActionHandle {
    type Output = InputResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            HandleState::Ready(result) => Poll::Ready(result.take().unwrap_or_else(|| {
                InputResult::failed("action handle polled after completion")
            })),
            HandleState::Pending(join) => match Pin::new(join).poll(cx) {
                Poll::Ready(Ok(result)) => Poll::Ready(result),
                Poll::Ready(Err(e)) => {
                    error!(error = %e, "action job did not complete");
                    Poll::Ready(InputResult::failed(format!("action job did not complete: {e}")))
                }
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

/// Runs blocking action jobs on a tokio runtime, at most `limit` at a time.
#[derive(Clone)]
pub struct ActionWorkerPool {
    runtime: Handle,
    permits: Arc<Semaphore>,
    limit: usize,
}

impl ActionWorkerPool {
    /// Creates a pool bound to `runtime`.  A `limit` of zero is raised to one.
    pub fn new(runtime: Handle, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            runtime,
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Queues `job` and returns a handle resolving to its result.
    ///
    /// Callable from any thread, inside or outside the runtime.
    pub fn submit<F>(&self, job: F) -> ActionHandle
    where
        F: FnOnce() -> InputResult + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let join = self.runtime.spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return InputResult::failed("action worker pool is shut down"),
            };
            match tokio::task::spawn_blocking(job).await {
                Ok(result) => result,
                Err(e) => InputResult::failed(format!("action job panicked: {e}")),
            }
        });
        ActionHandle::pending(join)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_ready_handle_resolves_on_first_poll() {
        let handle = ActionHandle::ready(InputResult::cooldown());
        assert!(handle.is_finished());

        let mut task = tokio_test::task::spawn(handle);
        let result = tokio_test::assert_ready!(task.poll());

        assert!(result.is_cooldown());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_submit_runs_job_and_resolves_with_its_result() {
        // Arrange
        let pool = ActionWorkerPool::new(Handle::current(), 2);

        // Act
        let result = pool.submit(|| InputResult::ok("done", "left_click")).await;

        // Assert
        assert!(result.success);
        assert_eq!(result.executed_action.as_deref(), Some("left_click"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_panicking_job_resolves_to_failure() {
        let pool = ActionWorkerPool::new(Handle::current(), 1);

        let result = pool.submit(|| panic!("boom")).await;

        assert!(!result.success);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pool_limits_concurrent_jobs() {
        // Arrange
        let pool = ActionWorkerPool::new(Handle::current(), 2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        // Act
        let handles: Vec<_> = (0..6)
            .map(|_| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                pool.submit(move || {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(20));
                    running.fetch_sub(1, Ordering::SeqCst);
                    InputResult::ok("ok", "left_click")
                })
            })
            .collect();
        for h in handles {
            assert!(h.await.success);
        }

        // Assert
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_zero_limit_is_raised_to_one() {
        let pool = ActionWorkerPool::new(Handle::current(), 0);
        assert_eq!(pool.limit(), 1);
    }

    #[test]
    fn test_dropped_handle_still_runs_job() {
        // Arrange
        let rt = tokio::runtime::Runtime::new().unwrap();
        let pool = ActionWorkerPool::new(rt.handle().clone(), 1);
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_in_job = Arc::clone(&ran);

        // Act – submit from outside the runtime and detach
        drop(pool.submit(move || {
            ran_in_job.fetch_add(1, Ordering::SeqCst);
            InputResult::ok("ok", "right_click")
        }));
        rt.block_on(async {
            for _ in 0..100 {
                if ran.load(Ordering::SeqCst) > 0 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        });

        // Assert
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
