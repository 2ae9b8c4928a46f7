//! The host view: connects a component tree to a mount state and follows
//! the measure, layout and window attachment calls of its embedder.

use rendertree_layout::{Size, SizeSpec};

use crate::{
    ComponentRef, ComponentTree, HostContext, MountError, MountState, SharedContentPools,
};

pub struct HostView {
    context: HostContext,
    pools: SharedContentPools,
    tree: Option<ComponentTree>,
    mount_state: MountState,
    attached: bool,
    measured: Size,
    last_specs: Option<(SizeSpec, SizeSpec)>,
    mounted_generation: Option<u64>,
}

impl HostView {
    pub fn new(context: HostContext, pools: SharedContentPools) -> Self {
        Self {
            mount_state: MountState::new(context.clone()),
            context,
            pools,
            tree: None,
            attached: false,
            measured: Size::ZERO,
            last_specs: None,
            mounted_generation: None,
        }
    }

    pub fn context(&self) -> &HostContext {
        &self.context
    }

    pub fn pools(&self) -> &SharedContentPools {
        &self.pools
    }

    pub fn component_tree(&self) -> Option<&ComponentTree> {
        self.tree.as_ref()
    }

    pub fn component_tree_mut(&mut self) -> Option<&mut ComponentTree> {
        self.tree.as_mut()
    }

    pub fn mount_state(&self) -> &MountState {
        &self.mount_state
    }

    pub fn measured_size(&self) -> Size {
        self.measured
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Installs `tree`, adopting its pools. The next layout mounts its
    /// committed result.
    pub fn set_component_tree(&mut self, tree: ComponentTree) {
        self.pools = tree.pools().clone();
        self.tree = Some(tree);
        self.mounted_generation = None;
    }

    /// Sets the root of the current tree, creating a tree on first use.
    pub fn set_root(&mut self, root: ComponentRef) -> bool {
        let context = &self.context;
        let pools = &self.pools;
        self.tree
            .get_or_insert_with(|| ComponentTree::builder(context.clone(), pools.clone()).build())
            .set_root(root)
    }

    /// Measures the content. Exact specs in both dimensions are answered
    /// directly and the calculation is left to [`HostView::layout`].
    pub fn measure(&mut self, width: SizeSpec, height: SizeSpec) -> Result<Size, MountError> {
        self.last_specs = Some((width, height));
        if width.is_exact() && height.is_exact() {
            log::debug!("exact specs [{} x {}], deferring layout", width, height);
            self.measured = Size::new(width.size, height.size);
            return Ok(self.measured);
        }
        let measured = match self.tree.as_mut() {
            Some(tree) => tree.measure(width, height)?,
            None => Size::ZERO,
        };
        self.measured = Size::new(width.resolve(measured.width), height.resolve(measured.height));
        Ok(self.measured)
    }

    /// Makes sure a layout for the last measured specs is committed and
    /// mounted. Does nothing when the mounted layout is still current.
    pub fn layout(&mut self) -> Result<(), MountError> {
        let drained = self.pools.borrow_mut().drain_pending();
        if drained > 0 {
            log::trace!("ran {} pending pool tasks", drained);
        }
        let Some(tree) = self.tree.as_mut() else {
            return Ok(());
        };
        let Some((width, height)) = self.last_specs.or(tree.size_specs()) else {
            return Ok(());
        };
        tree.ensure_layout(width, height)?;
        let Some(layout) = tree.committed_layout() else {
            return Ok(());
        };
        if self.mounted_generation == Some(layout.generation()) {
            return Ok(());
        }
        self.mount_state
            .mount(&layout, &mut self.pools.borrow_mut())?;
        self.mounted_generation = Some(layout.generation());
        Ok(())
    }

    pub fn attach_to_window(&mut self) -> Result<(), MountError> {
        if self.attached {
            return Ok(());
        }
        self.attached = true;
        self.mount_state.reattach()
    }

    /// Unbinds every bound item, including content mounted before the view
    /// was first attached.
    pub fn detach_from_window(&mut self) -> Result<(), MountError> {
        self.attached = false;
        self.mount_state.detach()
    }

    /// Unmounts everything but the root host. The next layout mounts the
    /// committed result from scratch.
    pub fn unmount_all_items(&mut self) -> Result<(), MountError> {
        self.mounted_generation = None;
        self.mount_state
            .unmount_all_items(&mut self.pools.borrow_mut())
    }

    /// Unmounts all content and releases the component tree.
    pub fn release(&mut self) -> Result<(), MountError> {
        self.unmount_all_items()?;
        self.mount_state.clear_poisoned();
        match self.tree.as_mut() {
            Some(tree) => tree.release(),
            None => Ok(()),
        }
    }
}

impl Drop for HostView {
    fn drop(&mut self) {
        if self.mount_state.mount_count() <= 1 {
            return;
        }
        let Ok(mut pools) = self.pools.try_borrow_mut() else {
            log::error!("content pools are borrowed, skipping unmount on drop");
            return;
        };
        if let Err(err) = self.mount_state.unmount_all_items(&mut pools) {
            log::error!("failed to unmount host content on drop: {err}");
        }
    }
}
