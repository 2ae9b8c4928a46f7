use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleStep {
    OnCreateTreeProp,
    OnCalculateCachedValue,
    OnPrepare,
    OnMeasure,
    OnBoundsDefined,
    OnAttached,
    OnDetached,
    OnCreateMountContent,
    OnMount,
    OnBind,
    OnUnbind,
    OnUnmount,
}

/// Shared, append-only record of the callbacks a tester received.
///
/// Clones share the same record. Two logs compare equal only when they are
/// the same record. The log is `Send` so mount specs can record content
/// creation from a background executor.
#[derive(Clone, Default)]
pub struct StepLog(Arc<Mutex<Vec<LifecycleStep>>>);

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<LifecycleStep>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, step: LifecycleStep) {
        self.entries().push(step);
    }

    pub fn steps(&self) -> Vec<LifecycleStep> {
        self.entries().clone()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn ptr_eq(&self, other: &StepLog) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for StepLog {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for StepLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries().iter()).finish()
    }
}
