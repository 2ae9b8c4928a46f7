//! Engine configuration threaded through pool and tree construction.

/// How content pools are keyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PoolPolicy {
    /// One pool per component type, shared by every context derived from the
    /// same application.
    Global,
    /// One pool per component type and owning context.
    #[default]
    Local,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentsConfig {
    pub pool_policy: PoolPolicy,
    pub preallocate_mount_content: bool,
}

impl ComponentsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool_policy(mut self, policy: PoolPolicy) -> Self {
        self.pool_policy = policy;
        self
    }

    pub fn preallocate_mount_content(mut self, enabled: bool) -> Self {
        self.preallocate_mount_content = enabled;
        self
    }
}
