//! Owning contexts for component trees and the content they mount.
//!
//! An application context is the root of a hierarchy. Every context derived
//! from it with [`HostContext::wrap`] gets its own identity while sharing the
//! application, which is what global content pools key on.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_context_id() -> ContextId {
    ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
}

struct ContextInner {
    id: ContextId,
    application: Option<HostContext>,
}

/// Cheap, thread-safe handle to an owning context.
#[derive(Clone)]
pub struct HostContext {
    inner: Arc<ContextInner>,
}

impl HostContext {
    /// Creates a new application context.
    pub fn application() -> Self {
        Self {
            inner: Arc::new(ContextInner {
                id: next_context_id(),
                application: None,
            }),
        }
    }

    /// Derives a new context that shares this context's application.
    pub fn wrap(&self) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                id: next_context_id(),
                application: Some(self.application_context()),
            }),
        }
    }

    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    pub fn is_application(&self) -> bool {
        self.inner.application.is_none()
    }

    /// Returns the application context this context was derived from, or the
    /// context itself when it is an application.
    pub fn application_context(&self) -> HostContext {
        match &self.inner.application {
            Some(application) => application.clone(),
            None => self.clone(),
        }
    }
}

impl PartialEq for HostContext {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for HostContext {}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("id", &self.inner.id.0)
            .field(
                "application",
                &self.inner.application.as_ref().map(|app| app.id().0),
            )
            .finish()
    }
}
