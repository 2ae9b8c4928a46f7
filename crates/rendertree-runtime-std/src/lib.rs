//! Standard runtime services backed by Rust's `std` library.
//!
//! [`ThreadExecutor`] runs content preallocation on a dedicated worker
//! thread. Results still reach the pools through the owner queue, so the
//! owner thread drains them with [`run_until_idle`] or
//! [`rendertree_core::ContentPools::drain_pending`].

use std::fmt;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rendertree_core::{PreallocationExecutor, SharedContentPools};

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Pending {
    fn increment(&self) {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn decrement(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }
}

/// Executor backed by a single named worker thread.
pub struct ThreadExecutor {
    sender: Mutex<Option<Sender<Job>>>,
    pending: Arc<Pending>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadExecutor {
    pub fn new() -> io::Result<Self> {
        Self::with_name("rendertree-prealloc")
    }

    pub fn with_name(name: &str) -> io::Result<Self> {
        let (sender, receiver) = channel::<Job>();
        let pending = Arc::new(Pending::default());
        let worker_pending = Arc::clone(&pending);
        let worker = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                for job in receiver {
                    if catch_unwind(AssertUnwindSafe(job)).is_err() {
                        log::error!("preallocation job panicked");
                    }
                    worker_pending.decrement();
                }
            })?;
        Ok(Self {
            sender: Mutex::new(Some(sender)),
            pending,
            worker: Some(worker),
        })
    }

    /// Number of submitted jobs that have not finished.
    pub fn pending(&self) -> usize {
        *self
            .pending
            .count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until every submitted job has finished.
    pub fn wait_idle(&self) {
        let mut count = self
            .pending
            .count
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while *count > 0 {
            count = self
                .pending
                .idle
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`ThreadExecutor::wait_idle`] but gives up after `timeout`.
    /// Returns whether the executor became idle.
    pub fn wait_idle_timeout(&self, timeout: Duration) -> bool {
        let count = self
            .pending
            .count
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (count, _) = self
            .pending
            .idle
            .wait_timeout_while(count, timeout, |count| *count > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *count == 0
    }
}

impl PreallocationExecutor for ThreadExecutor {
    fn execute(&self, job: Box<dyn FnOnce() + Send + 'static>) {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = sender.as_ref() else {
            log::warn!("executor is shut down, dropping preallocation job");
            return;
        };
        self.pending.increment();
        if sender.send(job).is_err() {
            log::warn!("preallocation worker is gone, dropping job");
            self.pending.decrement();
        }
    }
}

impl fmt::Debug for ThreadExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadExecutor")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Drop for ThreadExecutor {
    fn drop(&mut self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("preallocation worker panicked");
            }
        }
    }
}

/// Waits for `executor` to finish its jobs, then runs the tasks they posted
/// on the calling thread. Returns how many tasks ran.
pub fn run_until_idle(executor: &ThreadExecutor, pools: &SharedContentPools) -> usize {
    executor.wait_idle();
    pools.borrow_mut().drain_pending()
}
