//! Timer seam
//!
//! Heartbeats and reconnection retries are repeating tasks registered here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Callback run on every tick
pub type ScheduledTask = Arc<dyn Fn() + Send + Sync>;

/// Registers repeating tasks
pub trait Scheduler: Send + Sync {
    /// Run `task` every `interval`, first after one interval has elapsed
    fn schedule(&self, interval: Duration, task: ScheduledTask) -> TaskHandle;
}

/// Cancellation handle for a scheduled task
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
    abort: Arc<Mutex<Option<AbortHandle>>>,
}

impl TaskHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle whose cancellation also aborts a tokio task
    #[must_use]
    pub fn with_abort(abort: AbortHandle) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            abort: Arc::new(Mutex::new(Some(abort))),
        }
    }

    /// Stop the task. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(abort) = self.abort.lock().take() {
            abort.abort();
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Shortest period [`TokioScheduler`] runs a task at; zero would stall the ticker
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Scheduler backed by `tokio::time`
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, interval: Duration, task: ScheduledTask) -> TaskHandle {
        let Ok(runtime) = Handle::try_current() else {
            tracing::error!("No tokio runtime available; task not scheduled");
            let handle = TaskHandle::new();
            handle.cancel();
            return handle;
        };

        let interval = interval.max(MIN_INTERVAL);
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let join = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                task();
            }
        });

        TaskHandle {
            cancelled,
            abort: Arc::new(Mutex::new(Some(join.abort_handle()))),
        }
    }
}
