//! Map and set types shared by the layout, tree and mount state.

pub mod map {
    #[cfg(feature = "std-hash")]
    pub use std::collections::{HashMap, HashSet};

    #[cfg(not(feature = "std-hash"))]
    pub use hashbrown::{HashMap, HashSet};
}
