//! Chaining harness driving a [`HostView`] the way an embedding window would.

use std::cell::RefMut;
use std::sync::Arc;

use rendertree_core::{
    ComponentRef, ComponentTree, ComponentsConfig, ContentPools, HostContext, HostView,
    MountError, MountState, SharedContentPools,
};
use rendertree_layout::{Size, SizeSpec};
use rendertree_runtime_std::ThreadExecutor;

const DEFAULT_WIDTH_PX: f32 = 1080.0;

/// Owns an application context, an activity context derived from it, the
/// pool registry and a host view.
///
/// Operations panic on engine errors so tests read as a single chain:
///
/// ```ignore
/// rule.set_root(root).attach_to_window().measure().layout();
/// ```
pub struct HostViewRule {
    application: HostContext,
    context: HostContext,
    pools: SharedContentPools,
    host_view: HostView,
    width_spec: SizeSpec,
    height_spec: SizeSpec,
    executor: Option<Arc<ThreadExecutor>>,
}

impl HostViewRule {
    pub fn new() -> Self {
        Self::with_config(ComponentsConfig::new())
    }

    pub fn with_config(config: ComponentsConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let application = HostContext::application();
        let context = application.wrap();
        let pools = ContentPools::shared(config);
        Self {
            host_view: HostView::new(context.clone(), pools.clone()),
            application,
            context,
            pools,
            width_spec: SizeSpec::exactly(DEFAULT_WIDTH_PX),
            height_spec: SizeSpec::unspecified(),
            executor: None,
        }
    }

    pub fn application_context(&self) -> &HostContext {
        &self.application
    }

    /// The activity-like context the host view and its trees are built with.
    pub fn context(&self) -> &HostContext {
        &self.context
    }

    pub fn pools(&self) -> RefMut<'_, ContentPools> {
        self.pools.borrow_mut()
    }

    pub fn shared_pools(&self) -> &SharedContentPools {
        &self.pools
    }

    pub fn host_view(&self) -> &HostView {
        &self.host_view
    }

    pub fn host_view_mut(&mut self) -> &mut HostView {
        &mut self.host_view
    }

    pub fn mount_state(&self) -> &MountState {
        self.host_view.mount_state()
    }

    pub fn width_spec(&self) -> SizeSpec {
        self.width_spec
    }

    pub fn height_spec(&self) -> SizeSpec {
        self.height_spec
    }

    pub fn measured_size(&self) -> Size {
        self.host_view.measured_size()
    }

    /// Builder for a tree sharing this rule's context and pools.
    pub fn component_tree_builder(&self) -> rendertree_core::ComponentTreeBuilder {
        ComponentTree::builder(self.context.clone(), self.pools.clone())
    }

    /// Background executor whose jobs [`HostViewRule::run_ui_tasks`] waits
    /// for.
    pub fn background_executor(&mut self) -> Arc<ThreadExecutor> {
        if let Some(executor) = &self.executor {
            return Arc::clone(executor);
        }
        let executor = match ThreadExecutor::new() {
            Ok(executor) => Arc::new(executor),
            Err(err) => panic!("failed to start background executor: {err}"),
        };
        self.executor = Some(Arc::clone(&executor));
        executor
    }

    pub fn use_component_tree(&mut self, tree: ComponentTree) -> &mut Self {
        self.host_view.set_component_tree(tree);
        self
    }

    pub fn component_tree(&mut self) -> &mut ComponentTree {
        match self.host_view.component_tree_mut() {
            Some(tree) => tree,
            None => panic!("no component tree; call set_root or use_component_tree first"),
        }
    }

    pub fn set_root(&mut self, root: ComponentRef) -> &mut Self {
        self.host_view.set_root(root);
        self
    }

    pub fn set_size_px(&mut self, width: f32, height: f32) -> &mut Self {
        self.set_size_specs(SizeSpec::exactly(width), SizeSpec::exactly(height))
    }

    pub fn set_size_specs(&mut self, width: SizeSpec, height: SizeSpec) -> &mut Self {
        self.width_spec = width;
        self.height_spec = height;
        self
    }

    pub fn attach_to_window(&mut self) -> &mut Self {
        let result = self.host_view.attach_to_window();
        self.check("attach_to_window", result)
    }

    pub fn detach_from_window(&mut self) -> &mut Self {
        let result = self.host_view.detach_from_window();
        self.check("detach_from_window", result)
    }

    pub fn measure(&mut self) -> &mut Self {
        let result = self
            .host_view
            .measure(self.width_spec, self.height_spec)
            .map(|_| ());
        self.check("measure", result)
    }

    pub fn layout(&mut self) -> &mut Self {
        let result = self.host_view.layout();
        self.check("layout", result)
    }

    pub fn unmount_all_items(&mut self) -> &mut Self {
        let result = self.host_view.unmount_all_items();
        self.check("unmount_all_items", result)
    }

    /// Waits for background preallocation and runs the tasks it posted to
    /// the owner queue. Returns how many tasks ran.
    pub fn run_ui_tasks(&mut self) -> usize {
        if let Some(executor) = &self.executor {
            log::trace!("waiting for {} background jobs", executor.pending());
            executor.wait_idle();
        }
        let ran = self.pools.borrow_mut().drain_pending();
        log::debug!("ran {} ui tasks", ran);
        ran
    }

    fn check(&mut self, operation: &str, result: Result<(), MountError>) -> &mut Self {
        if let Err(err) = result {
            panic!("{operation} failed: {err}");
        }
        self
    }
}

impl Default for HostViewRule {
    fn default() -> Self {
        Self::new()
    }
}
