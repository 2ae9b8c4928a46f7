//! Recycling caches of detached mount content.
//!
//! Pools are registered lazily, the first time a type needs one, under a key
//! derived from the configured [`PoolPolicy`]. The registry lives on the
//! owner thread; background preallocation hands finished instances back
//! through the owner queue, so an instance is only visible to `acquire` once
//! [`ContentPools::drain_pending`] has run.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::runtime::{OwnerQueue, TaskHandle};
use crate::{
    CallbackError, CallbackResult, ComponentsConfig, ContentKind, ContextId, HostContext,
    MountContent, MountSpec, PoolPolicy, PreallocationExecutor,
};

pub type SharedContentPools = Rc<RefCell<ContentPools>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolScope {
    /// Shared by every context derived from this application.
    Application(ContextId),
    /// Private to one owning context.
    Context(ContextId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub name: &'static str,
    pub scope: PoolScope,
}

/// Idle content instances of one mount spec type.
pub struct ContentPool {
    key: PoolKey,
    kind: ContentKind,
    context: HostContext,
    max_size: usize,
    available: Vec<MountContent>,
    preallocating: usize,
}

impl ContentPool {
    fn new(key: PoolKey, kind: ContentKind, context: HostContext, max_size: usize) -> Self {
        Self {
            key,
            kind,
            context,
            max_size,
            available: Vec::new(),
            preallocating: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.key.name
    }

    pub fn key(&self) -> PoolKey {
        self.key
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Context new instances of this pool are created with.
    pub fn context(&self) -> &HostContext {
        &self.context
    }

    /// Number of idle instances.
    pub fn size(&self) -> usize {
        self.available.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn acquire(&mut self) -> Option<MountContent> {
        self.available.pop()
    }

    /// Returns an idle instance, or builds one with the pool's context.
    pub fn acquire_or_create(&mut self, spec: &dyn MountSpec) -> CallbackResult<MountContent> {
        match self.acquire() {
            Some(content) => Ok(content),
            None => spec.create_mount_content(&self.context),
        }
    }

    /// Stores `content` for reuse. A full pool drops it and returns false.
    pub fn release(&mut self, content: MountContent) -> bool {
        if self.available.len() >= self.max_size {
            return false;
        }
        self.available.push(content);
        true
    }

    /// Whether another instance fits once in-flight preallocations land.
    pub fn has_capacity(&self) -> bool {
        self.available.len() + self.preallocating < self.max_size
    }
}

/// Construction failure reported by a background preallocation job.
#[derive(Debug)]
pub struct PreallocationFault {
    pub pool: &'static str,
    pub error: CallbackError,
}

/// Registry of every content pool owned by one thread.
pub struct ContentPools {
    config: ComponentsConfig,
    pools: IndexMap<PoolKey, ContentPool>,
    queue: OwnerQueue,
    faults: Vec<PreallocationFault>,
}

impl ContentPools {
    pub fn new(config: ComponentsConfig) -> Self {
        Self {
            config,
            pools: IndexMap::new(),
            queue: OwnerQueue::new(),
            faults: Vec::new(),
        }
    }

    pub fn shared(config: ComponentsConfig) -> SharedContentPools {
        Rc::new(RefCell::new(Self::new(config)))
    }

    pub fn config(&self) -> &ComponentsConfig {
        &self.config
    }

    /// Changes the policy for pools registered from now on. Existing pools
    /// keep their keys.
    pub fn set_pool_policy(&mut self, policy: PoolPolicy) {
        self.config.pool_policy = policy;
    }

    pub fn pool_key(&self, context: &HostContext, spec: &dyn MountSpec) -> PoolKey {
        let scope = match self.config.pool_policy {
            PoolPolicy::Global if spec.uses_global_pool() => {
                PoolScope::Application(context.application_context().id())
            }
            _ => PoolScope::Context(context.id()),
        };
        PoolKey {
            name: spec.name(),
            scope,
        }
    }

    fn pool_for(&mut self, context: &HostContext, spec: &dyn MountSpec) -> &mut ContentPool {
        let key = self.pool_key(context, spec);
        self.pools.entry(key).or_insert_with(|| {
            let creation_context = match key.scope {
                PoolScope::Application(_) => context.application_context(),
                PoolScope::Context(_) => context.clone(),
            };
            log::debug!(
                "registering content pool {} ({:?}, max {})",
                key.name,
                key.scope,
                spec.pool_size()
            );
            ContentPool::new(key, spec.content_kind(), creation_context, spec.pool_size())
        })
    }

    /// Returns an idle instance for `spec` under `context`, registering the
    /// pool if needed. `None` is a pool miss. Types that are not poolable
    /// always miss and never get a pool.
    pub fn acquire(&mut self, context: &HostContext, spec: &dyn MountSpec) -> Option<MountContent> {
        if spec.pool_size() == 0 {
            return None;
        }
        let pool = self.pool_for(context, spec);
        let content = pool.acquire();
        log::trace!(
            "pool {} {}",
            pool.name(),
            if content.is_some() { "hit" } else { "miss" }
        );
        content
    }

    pub fn acquire_or_create(
        &mut self,
        context: &HostContext,
        spec: &dyn MountSpec,
    ) -> CallbackResult<MountContent> {
        if spec.pool_size() == 0 {
            return spec.create_mount_content(context);
        }
        match self.acquire(context, spec) {
            Some(content) => Ok(content),
            None => {
                let pool = self.pool_for(context, spec);
                spec.create_mount_content(pool.context())
            }
        }
    }

    /// Returns `content` to the pool registered under `key`.
    pub fn release(&mut self, key: &PoolKey, content: MountContent) -> bool {
        match self.pools.get_mut(key) {
            Some(pool) => pool.release(content),
            None => false,
        }
    }

    /// Builds one instance on the calling thread and stores it, if the type
    /// is poolable and its pool has room. Returns whether an instance was
    /// added.
    pub fn maybe_preallocate_content(
        &mut self,
        context: &HostContext,
        spec: &dyn MountSpec,
    ) -> CallbackResult<bool> {
        if spec.pool_size() == 0 {
            return Ok(false);
        }
        let pool = self.pool_for(context, spec);
        if !pool.has_capacity() {
            return Ok(false);
        }
        let content = spec.create_mount_content(pool.context())?;
        Ok(pool.release(content))
    }

    /// Builds one instance on `executor` and deposits it through the owner
    /// queue. The pool is registered immediately.
    pub fn schedule_preallocation(
        &mut self,
        context: &HostContext,
        spec: Arc<dyn MountSpec>,
        executor: &dyn PreallocationExecutor,
    ) -> bool {
        if spec.pool_size() == 0 {
            return false;
        }
        let handle = self.queue.handle();
        let pool = self.pool_for(context, spec.as_ref());
        if !pool.has_capacity() {
            return false;
        }
        pool.preallocating += 1;
        let key = pool.key();
        let creation_context = pool.context().clone();
        log::trace!("scheduling preallocation for {}", key.name);
        executor.execute(Box::new(move || {
            let result = spec.create_mount_content(&creation_context);
            handle.post(Box::new(move |pools: &mut ContentPools| {
                pools.finish_preallocation(key, result)
            }));
        }));
        true
    }

    fn finish_preallocation(&mut self, key: PoolKey, result: CallbackResult<MountContent>) {
        let Some(pool) = self.pools.get_mut(&key) else {
            return;
        };
        pool.preallocating = pool.preallocating.saturating_sub(1);
        match result {
            Ok(content) => {
                pool.release(content);
            }
            Err(error) => {
                log::warn!("preallocation for {} failed: {}", key.name, error);
                self.faults.push(PreallocationFault {
                    pool: key.name,
                    error,
                });
            }
        }
    }

    /// Handle for posting work that must run against the pools on the owner
    /// thread.
    pub fn task_handle(&self) -> TaskHandle {
        self.queue.handle()
    }

    /// Runs every task posted to the owner queue. Returns how many ran.
    pub fn drain_pending(&mut self) -> usize {
        let tasks = self.queue.drain();
        let count = tasks.len();
        for task in tasks {
            task(self);
        }
        count
    }

    pub fn take_faults(&mut self) -> Vec<PreallocationFault> {
        std::mem::take(&mut self.faults)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Registered pools in creation order.
    pub fn pools(&self) -> impl Iterator<Item = &ContentPool> {
        self.pools.values()
    }

    pub fn pool(&self, index: usize) -> Option<&ContentPool> {
        self.pools.get_index(index).map(|(_, pool)| pool)
    }

    pub fn pool_mut(&mut self, index: usize) -> Option<&mut ContentPool> {
        self.pools.get_index_mut(index).map(|(_, pool)| pool)
    }

    pub fn get(&self, key: &PoolKey) -> Option<&ContentPool> {
        self.pools.get(key)
    }
}

#[cfg(test)]
#[path = "tests/pool_tests.rs"]
mod tests;
