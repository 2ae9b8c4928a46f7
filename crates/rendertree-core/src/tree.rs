//! The component tree controller: owns the declared root, decides when a new
//! layout is needed, and tracks which nodes are attached.

use std::rc::Rc;
use std::sync::Arc;

use rendertree_layout::{Size, SizeSpec};

use crate::collections::map::HashMap;
use crate::{
    calculate, ComponentContext, ComponentRef, HostContext, InlineExecutor, LayoutResult,
    MountError, NodeKey, PreallocationExecutor, SharedContentPools,
};

pub struct ComponentTreeBuilder {
    context: HostContext,
    pools: SharedContentPools,
    preallocate: Option<bool>,
    executor: Option<Arc<dyn PreallocationExecutor>>,
}

impl ComponentTreeBuilder {
    /// Overrides the pool configuration's preallocation switch for this tree.
    pub fn preallocate_mount_content(mut self, enabled: bool) -> Self {
        self.preallocate = Some(enabled);
        self
    }

    pub fn preallocation_executor(mut self, executor: Arc<dyn PreallocationExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn build(self) -> ComponentTree {
        let preallocate = self
            .preallocate
            .unwrap_or_else(|| self.pools.borrow().config().preallocate_mount_content);
        ComponentTree {
            context: self.context,
            pools: self.pools,
            root: None,
            root_dirty: false,
            size_specs: None,
            committed: None,
            attached: HashMap::new(),
            preallocate,
            executor: self.executor.unwrap_or_else(|| Arc::new(InlineExecutor)),
        }
    }
}

pub struct ComponentTree {
    context: HostContext,
    pools: SharedContentPools,
    root: Option<ComponentRef>,
    root_dirty: bool,
    size_specs: Option<(SizeSpec, SizeSpec)>,
    committed: Option<Rc<LayoutResult>>,
    attached: HashMap<NodeKey, (ComponentRef, ComponentContext)>,
    preallocate: bool,
    executor: Arc<dyn PreallocationExecutor>,
}

impl ComponentTree {
    pub fn builder(context: HostContext, pools: SharedContentPools) -> ComponentTreeBuilder {
        ComponentTreeBuilder {
            context,
            pools,
            preallocate: None,
            executor: None,
        }
    }

    pub fn context(&self) -> &HostContext {
        &self.context
    }

    pub fn pools(&self) -> &SharedContentPools {
        &self.pools
    }

    pub fn root(&self) -> Option<&ComponentRef> {
        self.root.as_ref()
    }

    pub fn size_specs(&self) -> Option<(SizeSpec, SizeSpec)> {
        self.size_specs
    }

    pub fn committed_layout(&self) -> Option<Rc<LayoutResult>> {
        self.committed.clone()
    }

    /// Whether the root changed since the last committed layout.
    pub fn is_dirty(&self) -> bool {
        self.root_dirty
    }

    /// Replaces the root. An equivalent root is ignored and `false` is
    /// returned. No callbacks run until the next measure or layout.
    pub fn set_root(&mut self, root: ComponentRef) -> bool {
        if let Some(current) = &self.root {
            if root.is_equivalent_to(current.as_ref()) {
                log::trace!("ignoring equivalent root {}", root.name());
                return false;
            }
        }
        self.root = Some(root);
        self.root_dirty = true;
        true
    }

    /// Stores the specs and computes a layout for them right away.
    pub fn set_size_spec(&mut self, width: SizeSpec, height: SizeSpec) -> Result<(), MountError> {
        self.size_specs = Some((width, height));
        self.ensure_layout(width, height).map(|_| ())
    }

    pub fn set_root_and_size_spec(
        &mut self,
        root: ComponentRef,
        width: SizeSpec,
        height: SizeSpec,
    ) -> Result<(), MountError> {
        self.set_root(root);
        self.set_size_spec(width, height)
    }

    /// Measures the tree, reusing the committed layout when the specs allow.
    pub fn measure(&mut self, width: SizeSpec, height: SizeSpec) -> Result<Size, MountError> {
        self.size_specs = Some((width, height));
        self.ensure_layout(width, height)?;
        Ok(match &self.committed {
            Some(layout) => layout.size(),
            None => Size::new(width.resolve(0.0), height.resolve(0.0)),
        })
    }

    /// Makes sure a layout compatible with the specs is committed. Returns
    /// whether a new one was calculated.
    pub fn ensure_layout(&mut self, width: SizeSpec, height: SizeSpec) -> Result<bool, MountError> {
        let Some(root) = self.root.clone() else {
            return Ok(false);
        };
        if !self.root_dirty {
            if let Some(committed) = &self.committed {
                if committed.is_compatible(width, height) {
                    log::debug!(
                        "reusing layout #{} for [{} x {}]",
                        committed.generation(),
                        width,
                        height
                    );
                    return Ok(false);
                }
            }
        }
        let layout = calculate(&root, &self.context, width, height)?;
        self.commit(layout)?;
        Ok(true)
    }

    fn commit(&mut self, layout: LayoutResult) -> Result<(), MountError> {
        let layout = Rc::new(layout);
        self.committed = Some(layout.clone());
        self.root_dirty = false;

        let mut current = HashMap::with_capacity(self.attached.len());
        let mut newly_attached = Vec::new();
        for node in layout.nodes() {
            let key = node.context.key().clone();
            if !self.attached.contains_key(&key) {
                newly_attached.push(key.clone());
            }
            current.insert(key, (node.component.clone(), node.context.clone()));
        }

        let gone: Vec<NodeKey> = self
            .attached
            .keys()
            .filter(|key| !current.contains_key(*key))
            .cloned()
            .collect();
        for key in gone {
            if let Some((component, context)) = self.attached.remove(&key) {
                component
                    .on_detached(&context)
                    .map_err(MountError::callback(component.name(), "on_detached"))?;
            }
        }
        for (key, entry) in current.iter() {
            if let Some(existing) = self.attached.get_mut(key) {
                *existing = entry.clone();
            }
        }
        for key in &newly_attached {
            if let Some((component, context)) = current.get(key) {
                component
                    .on_attached(context)
                    .map_err(MountError::callback(component.name(), "on_attached"))?;
                self.attached
                    .insert(key.clone(), (component.clone(), context.clone()));
            }
        }

        if self.preallocate {
            self.preallocate_for(&layout, &newly_attached);
        }
        Ok(())
    }

    fn preallocate_for(&self, layout: &LayoutResult, keys: &[NodeKey]) {
        let mut pools = self.pools.borrow_mut();
        for unit in layout.render_units() {
            if unit.spec.can_preallocate() && keys.contains(unit.context.key()) {
                pools.schedule_preallocation(&self.context, unit.spec.clone(), self.executor.as_ref());
            }
        }
    }

    /// Detaches every attached node and drops the committed layout. The root
    /// is kept and will be laid out again on the next request.
    pub fn release(&mut self) -> Result<(), MountError> {
        self.committed = None;
        self.root_dirty = self.root.is_some();
        for (_, (component, context)) in self.attached.drain() {
            component
                .on_detached(&context)
                .map_err(MountError::callback(component.name(), "on_detached"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
