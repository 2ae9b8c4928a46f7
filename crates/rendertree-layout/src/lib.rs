//! Layout contracts for rendertree.
//!
//! Size specs describe the constraint a parent hands to a child, geometry
//! types carry the outcome, and [`MeasurePolicy`] is the hook layout-only
//! containers implement to size and place their children.

mod geometry;
mod policy;
mod size_spec;

pub use geometry::*;
pub use policy::*;
pub use size_spec::*;

pub mod prelude {
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::policy::{Arrangement, MeasurePolicy};
    pub use crate::size_spec::{SizeSpec, SizeSpecMode};
}
