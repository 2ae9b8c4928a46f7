//! Layout-only containers built on the rendertree measure-policy contract.

mod column;
mod linear;
mod row;

pub use column::{Column, ColumnBuilder};
pub use linear::{Axis, LinearPolicy};
pub use row::{Row, RowBuilder};

pub mod prelude {
    pub use crate::{Column, Row};
    pub use rendertree_layout::Arrangement;
}
