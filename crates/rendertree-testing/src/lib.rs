//! Testing utilities and harness for rendertree

mod lifecycle;
mod rule;
mod testers;

pub use lifecycle::{LifecycleStep, StepLog};
pub use rule::HostViewRule;
pub use testers::{
    GlobalPoolLifecycleTester, LifecycleTrackerContent, LocalPoolLifecycleTester,
    MountSpecLifecycleTester, PreallocatedMountSpecLifecycleTester, TesterBuilder,
};

pub mod prelude {
    pub use crate::{HostViewRule, LifecycleStep, StepLog};
}
