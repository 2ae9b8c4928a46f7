//! The contract between the engine and component implementations.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use rendertree_layout::{MeasurePolicy, Rect, Size, SizeSpec};

use crate::collections::map::HashMap;
use crate::hash::hash_one;
use crate::{CallbackError, ContentKind, HostContext, MountContent};

pub type ComponentRef = Rc<dyn Component>;
pub type CallbackResult<T = ()> = Result<T, CallbackError>;
pub type CachedValue = Rc<dyn Any>;

pub const DEFAULT_POOL_SIZE: usize = 3;

/// Describes how the content of a mountable component is created and pooled.
///
/// Mount specs are shared with background executors for preallocation, so
/// they must be thread-safe and must not capture owner-thread state.
pub trait MountSpec: Send + Sync + 'static {
    /// Type name; pools are registered under it.
    fn name(&self) -> &'static str;

    fn content_kind(&self) -> ContentKind {
        ContentKind::View
    }

    fn create_mount_content(&self, context: &HostContext) -> CallbackResult<MountContent>;

    /// Maximum number of idle instances kept for reuse. Zero disables pooling.
    fn pool_size(&self) -> usize {
        DEFAULT_POOL_SIZE
    }

    fn can_preallocate(&self) -> bool {
        false
    }

    /// Whether this type may share a pool across contexts when the global
    /// pool policy is active.
    fn uses_global_pool(&self) -> bool {
        true
    }

    /// Whether a bounds change alone requires the content to be remounted.
    fn is_mount_size_dependent(&self) -> bool {
        false
    }
}

/// Immutable description of a piece of UI.
///
/// Every callback has a no-op default; implementations override the ones they
/// care about. A component that returns a [`MountSpec`] produces native
/// content, one that returns a [`MeasurePolicy`] lays out its children.
pub trait Component: Any {
    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    /// Value equality on type and props. Equivalent components never trigger
    /// a new layout or a remount.
    fn is_equivalent_to(&self, other: &dyn Component) -> bool;

    /// Explicit key overriding positional identity among siblings.
    fn key(&self) -> Option<&str> {
        None
    }

    fn mount_spec(&self) -> Option<Arc<dyn MountSpec>> {
        None
    }

    fn children(&self) -> Vec<ComponentRef> {
        Vec::new()
    }

    fn measure_policy(&self) -> Option<&dyn MeasurePolicy> {
        None
    }

    /// Whether the content mounted for `previous` must be updated to show
    /// `self`.
    fn should_update(&self, previous: &dyn Component) -> bool {
        !self.is_equivalent_to(previous)
    }

    /// Returns props made visible to every descendant of this node.
    fn on_create_tree_prop(&self, _context: &ComponentContext) -> CallbackResult<TreeProps> {
        Ok(TreeProps::default())
    }

    fn on_calculate_cached_value(
        &self,
        _context: &ComponentContext,
    ) -> CallbackResult<Option<CachedValue>> {
        Ok(None)
    }

    fn on_prepare(&self, _context: &ComponentContext) -> CallbackResult {
        Ok(())
    }

    fn on_measure(
        &self,
        _context: &ComponentContext,
        width: SizeSpec,
        height: SizeSpec,
    ) -> CallbackResult<Size> {
        Ok(Size::new(width.resolve(0.0), height.resolve(0.0)))
    }

    fn on_bounds_defined(&self, _context: &ComponentContext, _bounds: Rect) -> CallbackResult {
        Ok(())
    }

    fn on_attached(&self, _context: &ComponentContext) -> CallbackResult {
        Ok(())
    }

    fn on_detached(&self, _context: &ComponentContext) -> CallbackResult {
        Ok(())
    }

    fn on_mount(&self, _context: &ComponentContext, _content: &mut MountContent) -> CallbackResult {
        Ok(())
    }

    fn on_bind(&self, _context: &ComponentContext, _content: &mut MountContent) -> CallbackResult {
        Ok(())
    }

    fn on_unbind(&self, _context: &ComponentContext, _content: &mut MountContent) -> CallbackResult {
        Ok(())
    }

    fn on_unmount(
        &self,
        _context: &ComponentContext,
        _content: &mut MountContent,
    ) -> CallbackResult {
        Ok(())
    }
}

impl dyn Component {
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is_mountable(&self) -> bool {
        self.mount_spec().is_some()
    }
}

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name())
            .field("key", &self.key())
            .finish()
    }
}

/// Implements [`Component::is_equivalent_to`] for components with
/// `PartialEq` props.
pub fn equivalent<T: Component + PartialEq>(this: &T, other: &dyn Component) -> bool {
    other
        .as_any()
        .downcast_ref::<T>()
        .is_some_and(|other| this == other)
}

pub fn same_type(a: &dyn Component, b: &dyn Component) -> bool {
    a.as_any().type_id() == b.as_any().type_id()
}

/// Props propagated from a node to its descendants, keyed by value type.
#[derive(Clone, Default)]
pub struct TreeProps {
    props: Rc<HashMap<TypeId, Rc<dyn Any>>>,
}

impl TreeProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Any>(mut self, value: T) -> Self {
        Rc::make_mut(&mut self.props).insert(TypeId::of::<T>(), Rc::new(value));
        self
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.props
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Returns the union of both sets; `other` wins on conflicts.
    pub fn merged(&self, other: &TreeProps) -> TreeProps {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut props = (*self.props).clone();
        props.extend(other.props.iter().map(|(k, v)| (*k, v.clone())));
        TreeProps {
            props: Rc::new(props),
        }
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

impl fmt::Debug for TreeProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeProps").field("len", &self.len()).finish()
    }
}

/// Global identity of a node: the path of type names from the root.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(Rc<str>);

impl NodeKey {
    pub fn root(component: &dyn Component) -> Self {
        match component.key() {
            Some(key) => NodeKey(format!("{}#{}", component.name(), key).into()),
            None => NodeKey(component.name().into()),
        }
    }

    pub fn child(&self, component: &dyn Component, index: usize) -> Self {
        match component.key() {
            Some(key) => NodeKey(format!("{}/{}#{}", self.0, component.name(), key).into()),
            None => NodeKey(format!("{}/{}[{}]", self.0, component.name(), index).into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({})", self.0)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable index of a mounted item. Zero is reserved for the root host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderUnitId(u64);

impl RenderUnitId {
    pub const ROOT: RenderUnitId = RenderUnitId(0);

    pub fn for_key(key: &NodeKey) -> Self {
        match hash_one(key.as_str()) {
            0 => RenderUnitId(1),
            raw => RenderUnitId(raw),
        }
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for RenderUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Per-node state handed to every callback.
#[derive(Clone, Debug)]
pub struct ComponentContext {
    host: HostContext,
    key: NodeKey,
    tree_props: TreeProps,
    cached_value: Option<CachedValue>,
}

impl ComponentContext {
    pub(crate) fn new(host: HostContext, key: NodeKey, tree_props: TreeProps) -> Self {
        Self {
            host,
            key,
            tree_props,
            cached_value: None,
        }
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    /// Props created by this node's ancestors.
    pub fn tree_props(&self) -> &TreeProps {
        &self.tree_props
    }

    pub fn tree_prop<T: Any>(&self) -> Option<&T> {
        self.tree_props.get::<T>()
    }

    /// Value computed by `on_calculate_cached_value` during the current
    /// layout pass.
    pub fn cached_value<T: Any>(&self) -> Option<&T> {
        self.cached_value
            .as_ref()
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub(crate) fn set_cached_value(&mut self, value: Option<CachedValue>) {
        self.cached_value = value;
    }
}
