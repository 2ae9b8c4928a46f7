//! Layout calculation.
//!
//! A calculation walks the component tree in four passes: resolve (tree
//! props, cached values, prepare), measure, place (bounds defined), and
//! collection of the render units the mount state reconciles against.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rendertree_layout::{Point, Rect, Size, SizeSpec};

use crate::collections::map::HashSet;
use crate::{
    ComponentContext, ComponentRef, HostContext, MountError, MountSpec, NodeKey, RenderUnitId,
    TreeProps,
};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// One node of a calculated layout. Bounds are absolute within the host.
pub struct LayoutNode {
    pub component: ComponentRef,
    pub context: ComponentContext,
    pub bounds: Rect,
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    fn visit<'a>(&'a self, out: &mut Vec<&'a LayoutNode>) {
        out.push(self);
        for child in &self.children {
            child.visit(out);
        }
    }
}

/// A mountable node flattened out of the layout tree.
#[derive(Clone)]
pub struct RenderUnit {
    pub id: RenderUnitId,
    pub component: ComponentRef,
    pub context: ComponentContext,
    pub spec: Arc<dyn MountSpec>,
    pub bounds: Rect,
}

/// Output of measuring a component tree against a pair of size specs.
pub struct LayoutResult {
    generation: u64,
    width_spec: SizeSpec,
    height_spec: SizeSpec,
    size: Size,
    root: LayoutNode,
    render_units: Vec<RenderUnit>,
}

impl LayoutResult {
    /// Unique per calculation; lets the host tell whether it already mounted
    /// this result.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn width_spec(&self) -> SizeSpec {
        self.width_spec
    }

    pub fn height_spec(&self) -> SizeSpec {
        self.height_spec
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn root(&self) -> &LayoutNode {
        &self.root
    }

    pub fn render_units(&self) -> &[RenderUnit] {
        &self.render_units
    }

    /// Every node in pre-order.
    pub fn nodes(&self) -> Vec<&LayoutNode> {
        let mut out = Vec::new();
        self.root.visit(&mut out);
        out
    }

    /// Whether this result can be reused for a request with the given specs.
    pub fn is_compatible(&self, width: SizeSpec, height: SizeSpec) -> bool {
        self.width_spec.is_compatible_with(width, self.size.width)
            && self.height_spec.is_compatible_with(height, self.size.height)
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "layout #{} [{} x {}] -> {}x{}",
            self.generation, self.width_spec, self.height_spec, self.size.width, self.size.height
        );
        dump_node(&self.root, 1, &mut out);
        out
    }
}

fn dump_node(node: &LayoutNode, depth: usize, out: &mut String) {
    let b = node.bounds;
    let _ = writeln!(
        out,
        "{:indent$}{} ({},{} {}x{}){}",
        "",
        node.context.key(),
        b.x,
        b.y,
        b.width,
        b.height,
        if node.component.is_mountable() { " *" } else { "" },
        indent = depth * 2
    );
    for child in &node.children {
        dump_node(child, depth + 1, out);
    }
}

/// Runs every layout pass for `root` and returns the result.
pub fn calculate(
    root: &ComponentRef,
    host: &HostContext,
    width: SizeSpec,
    height: SizeSpec,
) -> Result<LayoutResult, MountError> {
    log::debug!("calculating layout for {} [{} x {}]", root.name(), width, height);
    let key = NodeKey::root(&**root);
    let mut tree = resolve(root.clone(), key, &TreeProps::default(), host)?;
    let size = measure(&mut tree, width, height)?;
    place(&mut tree, Point::ZERO)?;
    let render_units = collect_render_units(&tree)?;
    Ok(LayoutResult {
        generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        width_spec: width,
        height_spec: height,
        size,
        root: tree,
        render_units,
    })
}

fn resolve(
    component: ComponentRef,
    key: NodeKey,
    inherited: &TreeProps,
    host: &HostContext,
) -> Result<LayoutNode, MountError> {
    let name = component.name();
    let mut context = ComponentContext::new(host.clone(), key, inherited.clone());
    let created = component
        .on_create_tree_prop(&context)
        .map_err(MountError::callback(name, "on_create_tree_prop"))?;
    let cached = component
        .on_calculate_cached_value(&context)
        .map_err(MountError::callback(name, "on_calculate_cached_value"))?;
    context.set_cached_value(cached);
    component
        .on_prepare(&context)
        .map_err(MountError::callback(name, "on_prepare"))?;

    let child_props = inherited.merged(&created);
    let mut children = Vec::new();
    for (index, child) in component.children().into_iter().enumerate() {
        let child_key = context.key().child(&*child, index);
        children.push(resolve(child, child_key, &child_props, host)?);
    }
    Ok(LayoutNode {
        component,
        context,
        bounds: Rect::default(),
        children,
    })
}

/// Measures `node` and stores its size and its position relative to the
/// parent in `bounds`.
fn measure(node: &mut LayoutNode, width: SizeSpec, height: SizeSpec) -> Result<Size, MountError> {
    let component = node.component.clone();
    let size = if let Some(policy) = component.measure_policy() {
        let mut sizes = Vec::with_capacity(node.children.len());
        for (index, child) in node.children.iter_mut().enumerate() {
            let (child_width, child_height) = policy.child_specs(index, width, height);
            sizes.push(measure(child, child_width, child_height)?);
        }
        let arranged = policy.arrange(width, height, &sizes);
        for (child, position) in node.children.iter_mut().zip(arranged.positions) {
            child.bounds = child.bounds.translate(position.x, position.y);
        }
        arranged.size
    } else {
        for child in node.children.iter_mut() {
            measure(child, width, height)?;
        }
        if width.is_exact() && height.is_exact() {
            Size::new(width.size, height.size)
        } else {
            let measured = component
                .on_measure(&node.context, width, height)
                .map_err(MountError::callback(component.name(), "on_measure"))?;
            Size::new(width.resolve(measured.width), height.resolve(measured.height))
        }
    };
    node.bounds = Rect::from_origin_size(node.bounds.origin(), size);
    Ok(size)
}

fn place(node: &mut LayoutNode, origin: Point) -> Result<(), MountError> {
    node.bounds = node.bounds.translate(origin.x, origin.y);
    node.component
        .on_bounds_defined(&node.context, node.bounds)
        .map_err(MountError::callback(node.component.name(), "on_bounds_defined"))?;
    let origin = node.bounds.origin();
    for child in node.children.iter_mut() {
        place(child, origin)?;
    }
    Ok(())
}

fn collect_render_units(root: &LayoutNode) -> Result<Vec<RenderUnit>, MountError> {
    let mut nodes = Vec::new();
    root.visit(&mut nodes);
    let mut seen = HashSet::new();
    let mut units = Vec::new();
    for node in nodes {
        let Some(spec) = node.component.mount_spec() else {
            continue;
        };
        let id = RenderUnitId::for_key(node.context.key());
        if !seen.insert(id) {
            return Err(MountError::DuplicateItem { id });
        }
        units.push(RenderUnit {
            id,
            component: node.component.clone(),
            context: node.context.clone(),
            spec,
            bounds: node.bounds,
        });
    }
    Ok(units)
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
