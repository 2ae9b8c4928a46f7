//! Contract for layout-only containers.

use crate::{Point, Size, SizeSpec};

/// Main-axis placement of children inside a linear container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Arrangement {
    #[default]
    Start,
    End,
    Center,
}

impl Arrangement {
    /// Offset applied to the first child given the free main-axis space.
    pub fn leading_offset(&self, free_space: f32) -> f32 {
        let free_space = free_space.max(0.0);
        match self {
            Arrangement::Start => 0.0,
            Arrangement::End => free_space,
            Arrangement::Center => free_space / 2.0,
        }
    }
}

/// Result of arranging a container's children.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Arranged {
    pub size: Size,
    pub positions: Vec<Point>,
}

/// Policy responsible for sizing and placing the children of a container.
///
/// The engine asks for the specs each child should be measured with, measures
/// the children itself so their lifecycle callbacks run in order, and hands
/// the measured sizes back to [`MeasurePolicy::arrange`].
pub trait MeasurePolicy {
    /// Specs used to measure the child at `index`.
    fn child_specs(&self, index: usize, width: SizeSpec, height: SizeSpec) -> (SizeSpec, SizeSpec);

    /// Computes the container size and the child positions.
    fn arrange(&self, width: SizeSpec, height: SizeSpec, children: &[Size]) -> Arranged;
}
