//! Platform abstraction for background work.

/// Runs content preallocation jobs on behalf of a component tree.
///
/// Implementations may run the job on any thread. Jobs publish their results
/// through the owner-thread task queue, so an executor needs no knowledge of
/// engine state.
pub trait PreallocationExecutor: Send + Sync {
    fn execute(&self, job: Box<dyn FnOnce() + Send + 'static>);
}

/// Runs every job immediately on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineExecutor;

impl PreallocationExecutor for InlineExecutor {
    fn execute(&self, job: Box<dyn FnOnce() + Send + 'static>) {
        job();
    }
}
