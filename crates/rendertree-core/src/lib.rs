//! Component tree reconciliation and mounting.
//!
//! A [`ComponentTree`] owns the declared root and computes [`LayoutResult`]s
//! for size specs, reusing the committed one when the specs are compatible.
//! A [`HostView`] hands committed layouts to its [`MountState`], which diffs
//! them against the mounted items and runs the component lifecycle. Native
//! content is recycled through [`ContentPools`].

pub mod collections;
mod component;
mod config;
mod content;
mod context;
mod error;
pub mod hash;
mod host;
mod layout;
mod mount_state;
mod platform;
mod pool;
mod runtime;
mod tree;

pub use component::{
    equivalent, same_type, CachedValue, CallbackResult, Component, ComponentContext, ComponentRef,
    MountSpec, NodeKey, RenderUnitId, TreeProps, DEFAULT_POOL_SIZE,
};
pub use config::{ComponentsConfig, PoolPolicy};
pub use content::{ContentKind, HostContent, MountContent};
pub use context::{ContextId, HostContext};
pub use error::{CallbackError, MountError};
pub use host::HostView;
pub use layout::{calculate, LayoutNode, LayoutResult, RenderUnit};
pub use mount_state::{BindState, MountItem, MountState};
pub use platform::{InlineExecutor, PreallocationExecutor};
pub use pool::{
    ContentPool, ContentPools, PoolKey, PoolScope, PreallocationFault, SharedContentPools,
};
pub use runtime::{PoolTask, TaskHandle};
pub use tree::{ComponentTree, ComponentTreeBuilder};

pub use rendertree_layout::{Point, Rect, Size, SizeSpec, SizeSpecMode};

pub mod prelude {
    pub use crate::{
        Component, ComponentContext, ComponentRef, ComponentTree, ContentPools, HostContext,
        HostView, MountContent, MountSpec,
    };
    pub use rendertree_layout::prelude::*;
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
