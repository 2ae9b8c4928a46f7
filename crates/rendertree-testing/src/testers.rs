//! Mountable components that record every lifecycle callback they receive.

use std::any::Any;
use std::rc::Rc;
use std::sync::Arc;

use rendertree_core::{
    equivalent, CachedValue, CallbackResult, Component, ComponentContext, HostContext,
    MountContent, MountSpec, TreeProps,
};
use rendertree_layout::{Rect, Size, SizeSpec};

use crate::{LifecycleStep, StepLog};

const PREFERRED_SIZE: f32 = 100.0;

/// Content created for every tester.
#[derive(Debug, Default)]
pub struct LifecycleTrackerContent;

#[derive(Clone, Copy)]
struct Profile {
    name: &'static str,
    can_preallocate: bool,
    uses_global_pool: bool,
    tracks_resolve: bool,
}

/// Records [`LifecycleStep::OnCreateMountContent`] whenever the engine
/// builds new content, on whichever thread builds it.
struct TesterSpec {
    profile: Profile,
    steps: StepLog,
}

impl MountSpec for TesterSpec {
    fn name(&self) -> &'static str {
        self.profile.name
    }

    fn create_mount_content(&self, context: &HostContext) -> CallbackResult<MountContent> {
        self.steps.record(LifecycleStep::OnCreateMountContent);
        Ok(MountContent::view(context, LifecycleTrackerContent))
    }

    fn can_preallocate(&self) -> bool {
        self.profile.can_preallocate
    }

    fn uses_global_pool(&self) -> bool {
        self.profile.uses_global_pool
    }

    fn is_mount_size_dependent(&self) -> bool {
        true
    }
}

#[derive(Clone)]
struct TesterCore {
    steps: StepLog,
    key: Option<String>,
    spec: Arc<TesterSpec>,
}

impl PartialEq for TesterCore {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
            && self.key == other.key
            && self.spec.profile.name == other.spec.profile.name
    }
}

impl TesterCore {
    fn record(&self, step: LifecycleStep) -> CallbackResult {
        self.steps.record(step);
        Ok(())
    }

    fn create_tree_prop(&self) -> CallbackResult<TreeProps> {
        if self.spec.profile.tracks_resolve {
            self.steps.record(LifecycleStep::OnCreateTreeProp);
        }
        Ok(TreeProps::new())
    }

    fn calculate_cached_value(&self) -> CallbackResult<Option<CachedValue>> {
        if !self.spec.profile.tracks_resolve {
            return Ok(None);
        }
        self.steps.record(LifecycleStep::OnCalculateCachedValue);
        Ok(Some(Rc::new(self.spec.profile.name)))
    }

    fn measure(&self, width: SizeSpec, height: SizeSpec) -> CallbackResult<Size> {
        self.steps.record(LifecycleStep::OnMeasure);
        Ok(Size::new(
            width.resolve(PREFERRED_SIZE),
            height.resolve(PREFERRED_SIZE),
        ))
    }
}

/// Builder shared by every tester type.
pub struct TesterBuilder<T> {
    steps: StepLog,
    key: Option<String>,
    profile: Profile,
    finish: fn(TesterCore) -> T,
}

impl<T> TesterBuilder<T> {
    /// Records into `steps`. Without it the tester records into a private log.
    pub fn steps(mut self, steps: &StepLog) -> Self {
        self.steps = steps.clone();
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn build(self) -> Rc<T> {
        Rc::new((self.finish)(TesterCore {
            spec: Arc::new(TesterSpec {
                profile: self.profile,
                steps: self.steps.clone(),
            }),
            steps: self.steps,
            key: self.key,
        }))
    }
}

macro_rules! lifecycle_tester {
    (
        $(#[$meta:meta])*
        $tester:ident {
            can_preallocate: $preallocate:expr,
            uses_global_pool: $global:expr,
            tracks_resolve: $resolve:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq)]
        pub struct $tester {
            core: TesterCore,
        }

        impl $tester {
            pub fn create() -> TesterBuilder<$tester> {
                TesterBuilder {
                    steps: StepLog::new(),
                    key: None,
                    profile: Profile {
                        name: stringify!($tester),
                        can_preallocate: $preallocate,
                        uses_global_pool: $global,
                        tracks_resolve: $resolve,
                    },
                    finish: |core| $tester { core },
                }
            }

            /// A distinct instance equivalent to this one.
            pub fn make_shallow_copy(&self) -> Rc<$tester> {
                Rc::new(self.clone())
            }

            pub fn steps(&self) -> &StepLog {
                &self.core.steps
            }
        }

        impl Component for $tester {
            fn name(&self) -> &'static str {
                stringify!($tester)
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn is_equivalent_to(&self, other: &dyn Component) -> bool {
                equivalent(self, other)
            }

            fn key(&self) -> Option<&str> {
                self.core.key.as_deref()
            }

            fn mount_spec(&self) -> Option<Arc<dyn MountSpec>> {
                Some(self.core.spec.clone())
            }

            fn on_create_tree_prop(&self, _context: &ComponentContext) -> CallbackResult<TreeProps> {
                self.core.create_tree_prop()
            }

            fn on_calculate_cached_value(
                &self,
                _context: &ComponentContext,
            ) -> CallbackResult<Option<CachedValue>> {
                self.core.calculate_cached_value()
            }

            fn on_prepare(&self, _context: &ComponentContext) -> CallbackResult {
                self.core.record(LifecycleStep::OnPrepare)
            }

            fn on_measure(
                &self,
                _context: &ComponentContext,
                width: SizeSpec,
                height: SizeSpec,
            ) -> CallbackResult<Size> {
                self.core.measure(width, height)
            }

            fn on_bounds_defined(&self, _context: &ComponentContext, _bounds: Rect) -> CallbackResult {
                self.core.record(LifecycleStep::OnBoundsDefined)
            }

            fn on_attached(&self, _context: &ComponentContext) -> CallbackResult {
                self.core.record(LifecycleStep::OnAttached)
            }

            fn on_detached(&self, _context: &ComponentContext) -> CallbackResult {
                self.core.record(LifecycleStep::OnDetached)
            }

            fn on_mount(
                &self,
                _context: &ComponentContext,
                _content: &mut MountContent,
            ) -> CallbackResult {
                self.core.record(LifecycleStep::OnMount)
            }

            fn on_bind(
                &self,
                _context: &ComponentContext,
                _content: &mut MountContent,
            ) -> CallbackResult {
                self.core.record(LifecycleStep::OnBind)
            }

            fn on_unbind(
                &self,
                _context: &ComponentContext,
                _content: &mut MountContent,
            ) -> CallbackResult {
                self.core.record(LifecycleStep::OnUnbind)
            }

            fn on_unmount(
                &self,
                _context: &ComponentContext,
                _content: &mut MountContent,
            ) -> CallbackResult {
                self.core.record(LifecycleStep::OnUnmount)
            }
        }
    };
}

lifecycle_tester! {
    /// Records every lifecycle callback, including tree prop creation and
    /// cached value calculation.
    MountSpecLifecycleTester {
        can_preallocate: false,
        uses_global_pool: true,
        tracks_resolve: true,
    }
}

lifecycle_tester! {
    /// Opts into content preallocation. Creates no tree props and no cached
    /// value.
    PreallocatedMountSpecLifecycleTester {
        can_preallocate: true,
        uses_global_pool: true,
        tracks_resolve: false,
    }
}

lifecycle_tester! {
    GlobalPoolLifecycleTester {
        can_preallocate: false,
        uses_global_pool: true,
        tracks_resolve: true,
    }
}

lifecycle_tester! {
    /// Always gets a pool private to its owning context.
    LocalPoolLifecycleTester {
        can_preallocate: false,
        uses_global_pool: false,
        tracks_resolve: true,
    }
}
