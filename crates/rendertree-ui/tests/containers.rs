use std::any::Any;
use std::rc::Rc;

use rendertree_core::{calculate, equivalent, Component, ComponentRef, HostContext};
use rendertree_layout::{Rect, Size, SizeSpec};
use rendertree_ui::{Column, Row};

#[derive(PartialEq)]
struct Block {
    size: Size,
}

impl Component for Block {
    fn name(&self) -> &'static str {
        "Block"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_equivalent_to(&self, other: &dyn Component) -> bool {
        equivalent(self, other)
    }

    fn on_measure(
        &self,
        _context: &rendertree_core::ComponentContext,
        width: SizeSpec,
        height: SizeSpec,
    ) -> rendertree_core::CallbackResult<Size> {
        Ok(Size::new(width.resolve(self.size.width), height.resolve(self.size.height)))
    }
}

fn block(width: f32, height: f32) -> ComponentRef {
    Rc::new(Block {
        size: Size::new(width, height),
    })
}

#[test]
fn column_in_row_places_nodes_absolutely() {
    let root = Row::create()
        .child(block(30.0, 10.0))
        .child(Column::create().child(block(20.0, 5.0)).child(block(20.0, 5.0)).build())
        .build();

    let layout = calculate(
        &root,
        &HostContext::application(),
        SizeSpec::unspecified(),
        SizeSpec::at_most(100.0),
    )
    .expect("layout");

    let bounds: Vec<Rect> = layout.nodes().iter().map(|node| node.bounds).collect();
    assert_eq!(layout.size(), Size::new(50.0, 10.0));
    assert_eq!(bounds[1], Rect::new(0.0, 0.0, 30.0, 10.0));
    assert_eq!(bounds[2], Rect::new(30.0, 0.0, 20.0, 10.0));
    assert_eq!(bounds[4], Rect::new(30.0, 5.0, 20.0, 5.0));
}

#[test]
fn containers_compare_children() {
    let a = Column::create().child(block(1.0, 1.0)).build();
    let b = Column::create().child(block(1.0, 1.0)).build();
    let c = Column::create().child(block(2.0, 1.0)).build();
    let row = Row::create().child(block(1.0, 1.0)).build();

    assert!(a.is_equivalent_to(&*b));
    assert!(!a.is_equivalent_to(&*c));
    assert!(!a.is_equivalent_to(&*row));
}
