use rendertree_core::ComponentRef;
use rendertree_layout::{Arranged, Arrangement, MeasurePolicy, Point, Size, SizeSpec, SizeSpecMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Stacks children along `axis` and stretches them across the other one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearPolicy {
    pub axis: Axis,
    pub arrangement: Arrangement,
}

impl LinearPolicy {
    pub fn new(axis: Axis, arrangement: Arrangement) -> Self {
        Self { axis, arrangement }
    }

    fn split(&self, width: SizeSpec, height: SizeSpec) -> (SizeSpec, SizeSpec) {
        match self.axis {
            Axis::Horizontal => (width, height),
            Axis::Vertical => (height, width),
        }
    }

    fn split_size(&self, size: Size) -> (f32, f32) {
        match self.axis {
            Axis::Horizontal => (size.width, size.height),
            Axis::Vertical => (size.height, size.width),
        }
    }

    fn join<T>(&self, main: T, cross: T) -> (T, T) {
        match self.axis {
            Axis::Horizontal => (main, cross),
            Axis::Vertical => (cross, main),
        }
    }
}

impl MeasurePolicy for LinearPolicy {
    fn child_specs(&self, _index: usize, width: SizeSpec, height: SizeSpec) -> (SizeSpec, SizeSpec) {
        let (main, cross) = self.split(width, height);
        let main = match main.mode {
            SizeSpecMode::Exactly | SizeSpecMode::AtMost => SizeSpec::at_most(main.size),
            SizeSpecMode::Unspecified => SizeSpec::unspecified(),
        };
        self.join(main, cross)
    }

    fn arrange(&self, width: SizeSpec, height: SizeSpec, children: &[Size]) -> Arranged {
        let (main_spec, cross_spec) = self.split(width, height);
        let extents: Vec<(f32, f32)> = children
            .iter()
            .map(|size| self.split_size(*size))
            .collect();

        let content_main: f32 = extents.iter().map(|(main, _)| main).sum();
        let content_cross = extents
            .iter()
            .map(|(_, cross)| *cross)
            .fold(0.0_f32, f32::max);
        let main = main_spec.resolve(content_main);
        let cross = cross_spec.resolve(content_cross);

        let mut cursor = self.arrangement.leading_offset(main - content_main);
        let mut positions = Vec::with_capacity(children.len());
        for (child_main, _) in extents {
            let (x, y) = self.join(cursor, 0.0);
            positions.push(Point::new(x, y));
            cursor += child_main;
        }
        let (w, h) = self.join(main, cross);
        Arranged {
            size: Size::new(w, h),
            positions,
        }
    }
}

pub(crate) fn children_equivalent(a: &[ComponentRef], b: &[ComponentRef]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(a, b)| a.is_equivalent_to(&**b))
}

#[cfg(test)]
#[path = "tests/linear_tests.rs"]
mod tests;
