use std::error::Error;
use std::fmt;

use crate::RenderUnitId;

/// Failure raised by a component callback or a mount content factory.
pub struct CallbackError {
    source: Box<dyn Error + Send + Sync + 'static>,
}

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            source: message.into().into(),
        }
    }

    pub fn from_error(error: impl Error + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(error),
        }
    }
}

impl fmt::Debug for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CallbackError").field(&self.source).finish()
    }
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl Error for CallbackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

#[derive(Debug)]
pub enum MountError {
    Callback {
        component: &'static str,
        step: &'static str,
        source: CallbackError,
    },
    MissingItem {
        id: RenderUnitId,
    },
    DuplicateItem {
        id: RenderUnitId,
    },
    HostItem,
    Poisoned {
        id: RenderUnitId,
    },
}

impl MountError {
    pub(crate) fn callback(
        component: &'static str,
        step: &'static str,
    ) -> impl FnOnce(CallbackError) -> MountError {
        move |source| MountError::Callback {
            component,
            step,
            source,
        }
    }
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::Callback {
                component,
                step,
                source,
            } => write!(f, "{component}::{step} failed: {source}"),
            MountError::MissingItem { id } => write!(f, "no item mounted at {id}"),
            MountError::DuplicateItem { id } => write!(f, "item {id} is mounted twice"),
            MountError::HostItem => write!(f, "the root host item cannot be unmounted"),
            MountError::Poisoned { id } => {
                write!(f, "item {id} failed to unmount cleanly and cannot be reused")
            }
        }
    }
}

impl Error for MountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MountError::Callback { source, .. } => Some(source),
            _ => None,
        }
    }
}
