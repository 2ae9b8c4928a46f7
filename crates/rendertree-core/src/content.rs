//! Native content instances produced by mount specs.

use std::any::{type_name, Any};
use std::fmt;

use crate::HostContext;

/// Capability tag decided when a mount spec registers its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Participates in the host's view hierarchy.
    View,
    /// Drawn by its host without joining the view hierarchy.
    Drawable,
}

/// Marker stored in the root host item.
#[derive(Debug, Default)]
pub struct HostContent;

/// A live content instance together with the context it was created with.
pub struct MountContent {
    kind: ContentKind,
    context: HostContext,
    type_name: &'static str,
    value: Box<dyn Any + Send>,
}

impl MountContent {
    pub fn new<T: Any + Send>(kind: ContentKind, context: &HostContext, value: T) -> Self {
        Self {
            kind,
            context: context.clone(),
            type_name: type_name::<T>(),
            value: Box::new(value),
        }
    }

    pub fn view<T: Any + Send>(context: &HostContext, value: T) -> Self {
        Self::new(ContentKind::View, context, value)
    }

    pub fn drawable<T: Any + Send>(context: &HostContext, value: T) -> Self {
        Self::new(ContentKind::Drawable, context, value)
    }

    pub(crate) fn host(context: &HostContext) -> Self {
        Self::view(context, HostContent)
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn is_view(&self) -> bool {
        self.kind == ContentKind::View
    }

    pub fn context(&self) -> &HostContext {
        &self.context
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut::<T>()
    }
}

impl fmt::Debug for MountContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountContent")
            .field("kind", &self.kind)
            .field("context", &self.context)
            .field("type", &self.type_name)
            .finish()
    }
}
