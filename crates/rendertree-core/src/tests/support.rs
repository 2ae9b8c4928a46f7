//! Components shared by the engine's unit tests.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use rendertree_layout::{Arranged, MeasurePolicy, Point, Rect, Size, SizeSpec};

use crate::{
    equivalent, CallbackError, CallbackResult, CachedValue, Component, ComponentContext,
    ComponentRef, HostContext, MountContent, MountSpec, TreeProps,
};

pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.borrow().clone()
}

/// Depth the probe reads from its ancestors' tree props.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Depth(pub u32);

pub struct ProbeSpec {
    pub size_dependent: bool,
}

impl MountSpec for ProbeSpec {
    fn name(&self) -> &'static str {
        "Probe"
    }

    fn create_mount_content(&self, context: &HostContext) -> CallbackResult<MountContent> {
        Ok(MountContent::view(context, Vec::<String>::new()))
    }

    fn is_mount_size_dependent(&self) -> bool {
        self.size_dependent
    }
}

/// Mountable leaf that writes `label:step` for every callback it receives.
pub struct Probe {
    pub label: &'static str,
    pub journal: Journal,
    pub preferred: Size,
    pub key: Option<&'static str>,
    pub fail_on: Option<&'static str>,
    pub spec: Arc<ProbeSpec>,
    pub children: Vec<ComponentRef>,
}

impl PartialEq for Probe {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && Rc::ptr_eq(&self.journal, &other.journal)
            && self.preferred == other.preferred
            && self.key == other.key
    }
}

impl Probe {
    pub fn new(label: &'static str, journal: &Journal) -> Self {
        Self {
            label,
            journal: journal.clone(),
            preferred: Size::new(10.0, 10.0),
            key: None,
            fail_on: None,
            spec: Arc::new(ProbeSpec {
                size_dependent: false,
            }),
            children: Vec::new(),
        }
    }

    pub fn wrapping(mut self, child: ComponentRef) -> Self {
        self.children.push(child);
        self
    }

    pub fn size_dependent(mut self) -> Self {
        self.spec = Arc::new(ProbeSpec {
            size_dependent: true,
        });
        self
    }

    pub fn keyed(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    pub fn failing_on(mut self, step: &'static str) -> Self {
        self.fail_on = Some(step);
        self
    }

    pub fn build(self) -> ComponentRef {
        Rc::new(self)
    }

    fn record(&self, step: &'static str) -> CallbackResult {
        self.journal.borrow_mut().push(format!("{}:{}", self.label, step));
        if self.fail_on == Some(step) {
            return Err(CallbackError::new(format!("{} refused {}", self.label, step)));
        }
        Ok(())
    }
}

impl Component for Probe {
    fn name(&self) -> &'static str {
        "Probe"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_equivalent_to(&self, other: &dyn Component) -> bool {
        equivalent(self, other)
    }

    fn key(&self) -> Option<&str> {
        self.key
    }

    fn mount_spec(&self) -> Option<Arc<dyn MountSpec>> {
        Some(self.spec.clone())
    }

    fn children(&self) -> Vec<ComponentRef> {
        self.children.clone()
    }

    fn on_create_tree_prop(&self, context: &ComponentContext) -> CallbackResult<TreeProps> {
        let depth = context.tree_prop::<Depth>().map_or(0, |depth| depth.0);
        Ok(TreeProps::new().with(Depth(depth + 1)))
    }

    /// Caches the depth inherited from ancestors.
    fn on_calculate_cached_value(
        &self,
        context: &ComponentContext,
    ) -> CallbackResult<Option<CachedValue>> {
        self.record("cached")?;
        let inherited = context.tree_prop::<Depth>().copied().unwrap_or(Depth(0));
        Ok(Some(Rc::new(inherited)))
    }

    fn on_prepare(&self, _context: &ComponentContext) -> CallbackResult {
        self.record("prepare")
    }

    fn on_measure(
        &self,
        _context: &ComponentContext,
        width: SizeSpec,
        height: SizeSpec,
    ) -> CallbackResult<Size> {
        self.record("measure")?;
        Ok(Size::new(
            width.resolve(self.preferred.width),
            height.resolve(self.preferred.height),
        ))
    }

    fn on_bounds_defined(&self, _context: &ComponentContext, _bounds: Rect) -> CallbackResult {
        self.record("bounds")
    }

    fn on_attached(&self, _context: &ComponentContext) -> CallbackResult {
        self.record("attached")
    }

    fn on_detached(&self, _context: &ComponentContext) -> CallbackResult {
        self.record("detached")
    }

    fn on_mount(&self, _context: &ComponentContext, content: &mut MountContent) -> CallbackResult {
        if let Some(history) = content.downcast_mut::<Vec<String>>() {
            history.push(self.label.to_string());
        }
        self.record("mount")
    }

    fn on_bind(&self, _context: &ComponentContext, _content: &mut MountContent) -> CallbackResult {
        self.record("bind")
    }

    fn on_unbind(&self, _context: &ComponentContext, _content: &mut MountContent) -> CallbackResult {
        self.record("unbind")
    }

    fn on_unmount(
        &self,
        _context: &ComponentContext,
        _content: &mut MountContent,
    ) -> CallbackResult {
        self.record("unmount")
    }
}

struct StackPolicy;

impl MeasurePolicy for StackPolicy {
    fn child_specs(&self, _index: usize, width: SizeSpec, _height: SizeSpec) -> (SizeSpec, SizeSpec) {
        (width, SizeSpec::unspecified())
    }

    fn arrange(&self, width: SizeSpec, height: SizeSpec, children: &[Size]) -> Arranged {
        let mut y = 0.0;
        let mut widest: f32 = 0.0;
        let mut positions = Vec::with_capacity(children.len());
        for child in children {
            positions.push(Point::new(0.0, y));
            y += child.height;
            widest = widest.max(child.width);
        }
        Arranged {
            size: Size::new(width.resolve(widest), height.resolve(y)),
            positions,
        }
    }
}

/// Layout-only container stacking its children vertically.
pub struct Stack {
    pub children: Vec<ComponentRef>,
}

impl Stack {
    pub fn of(children: Vec<ComponentRef>) -> ComponentRef {
        Rc::new(Stack { children })
    }
}

impl Component for Stack {
    fn name(&self) -> &'static str {
        "Stack"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_equivalent_to(&self, other: &dyn Component) -> bool {
        other.downcast_ref::<Stack>().is_some_and(|other| {
            self.children.len() == other.children.len()
                && self
                    .children
                    .iter()
                    .zip(&other.children)
                    .all(|(a, b)| a.is_equivalent_to(&**b))
        })
    }

    fn children(&self) -> Vec<ComponentRef> {
        self.children.clone()
    }

    fn measure_policy(&self) -> Option<&dyn MeasurePolicy> {
        Some(&StackPolicy)
    }
}
