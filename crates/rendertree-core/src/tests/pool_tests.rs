use super::*;
use crate::InlineExecutor;

struct Widget;

impl MountSpec for Widget {
    fn name(&self) -> &'static str {
        "Widget"
    }

    fn create_mount_content(&self, context: &HostContext) -> CallbackResult<MountContent> {
        Ok(MountContent::view(context, ()))
    }

    fn pool_size(&self) -> usize {
        2
    }
}

struct LocalOnly;

impl MountSpec for LocalOnly {
    fn name(&self) -> &'static str {
        "LocalOnly"
    }

    fn create_mount_content(&self, context: &HostContext) -> CallbackResult<MountContent> {
        Ok(MountContent::drawable(context, ()))
    }

    fn uses_global_pool(&self) -> bool {
        false
    }
}

struct Broken;

impl MountSpec for Broken {
    fn name(&self) -> &'static str {
        "Broken"
    }

    fn create_mount_content(&self, _context: &HostContext) -> CallbackResult<MountContent> {
        Err(CallbackError::new("no content"))
    }
}

struct Unpooled;

impl MountSpec for Unpooled {
    fn name(&self) -> &'static str {
        "Unpooled"
    }

    fn create_mount_content(&self, context: &HostContext) -> CallbackResult<MountContent> {
        Ok(MountContent::view(context, ()))
    }

    fn pool_size(&self) -> usize {
        0
    }
}

/// Holds jobs until the test runs them, like a busy background thread.
#[derive(Default)]
struct DeferredExecutor {
    jobs: std::sync::Mutex<Vec<Box<dyn FnOnce() + Send>>>,
}

impl DeferredExecutor {
    fn run_all(&self) {
        let jobs: Vec<_> = self.jobs.lock().unwrap().drain(..).collect();
        for job in jobs {
            job();
        }
    }
}

impl PreallocationExecutor for DeferredExecutor {
    fn execute(&self, job: Box<dyn FnOnce() + Send + 'static>) {
        self.jobs.lock().unwrap().push(job);
    }
}

#[test]
fn pools_are_registered_lazily() {
    let app = HostContext::application();
    let mut pools = ContentPools::new(ComponentsConfig::new());
    assert!(pools.is_empty());

    assert!(pools.acquire(&app.wrap(), &Widget).is_none());
    assert_eq!(pools.len(), 1);
    assert_eq!(pools.pool(0).map(ContentPool::name), Some("Widget"));
}

#[test]
fn global_policy_shares_pool_between_wrapped_contexts() {
    let app = HostContext::application();
    let activity = app.wrap();
    let mut pools = ContentPools::new(ComponentsConfig::new().pool_policy(PoolPolicy::Global));

    pools.maybe_preallocate_content(&activity, &Widget).unwrap();
    pools.maybe_preallocate_content(&activity.wrap(), &Widget).unwrap();

    assert_eq!(pools.len(), 1);
    let pool = pools.pool(0).unwrap();
    assert_eq!(pool.size(), 2);
    assert_eq!(pool.context(), &app);
}

#[test]
fn local_policy_splits_pools_per_context() {
    let app = HostContext::application();
    let activity = app.wrap();
    let mut pools = ContentPools::new(ComponentsConfig::new());

    pools.maybe_preallocate_content(&activity, &Widget).unwrap();
    pools.maybe_preallocate_content(&activity.wrap(), &Widget).unwrap();

    assert_eq!(pools.len(), 2);
    assert_eq!(pools.pool(0).unwrap().context(), &activity);
}

#[test]
fn spec_can_opt_out_of_global_pool() {
    let app = HostContext::application();
    let activity = app.wrap();
    let mut pools = ContentPools::new(ComponentsConfig::new().pool_policy(PoolPolicy::Global));

    let content = pools.acquire_or_create(&activity, &LocalOnly).unwrap();
    assert_eq!(content.context(), &activity);
    assert_eq!(content.kind(), ContentKind::Drawable);
    assert_eq!(
        pools.pool_key(&activity, &LocalOnly).scope,
        PoolScope::Context(activity.id())
    );
}

#[test]
fn policy_change_only_affects_new_pools() {
    let app = HostContext::application();
    let activity = app.wrap();
    let mut pools = ContentPools::new(ComponentsConfig::new());

    pools.maybe_preallocate_content(&activity, &Widget).unwrap();
    pools.set_pool_policy(PoolPolicy::Global);
    pools.maybe_preallocate_content(&activity, &Widget).unwrap();

    assert_eq!(pools.len(), 2);
    assert_eq!(pools.pool(0).unwrap().key().scope, PoolScope::Context(activity.id()));
    assert_eq!(pools.pool(1).unwrap().key().scope, PoolScope::Application(app.id()));
}

#[test]
fn unpooled_types_never_register_a_pool() {
    let activity = HostContext::application().wrap();
    let mut pools = ContentPools::new(ComponentsConfig::new());

    assert!(pools.acquire(&activity, &Unpooled).is_none());
    let content = pools
        .acquire_or_create(&activity, &Unpooled)
        .expect("content is created directly");
    assert_eq!(content.context(), &activity);
    assert!(!pools.maybe_preallocate_content(&activity, &Unpooled).unwrap());

    assert!(pools.is_empty(), "no pool should exist for an unpooled type");
}

#[test]
fn release_respects_capacity() {
    let app = HostContext::application();
    let mut pools = ContentPools::new(ComponentsConfig::new());
    let key = pools.pool_key(&app, &Widget);

    for _ in 0..2 {
        assert!(pools.maybe_preallocate_content(&app, &Widget).unwrap());
    }
    assert!(!pools.maybe_preallocate_content(&app, &Widget).unwrap());
    assert!(!pools.release(&key, MountContent::view(&app, ())));
    assert_eq!(pools.get(&key).map(ContentPool::size), Some(2));
}

#[test]
fn scheduled_preallocation_is_visible_after_drain() {
    let app = HostContext::application();
    let mut pools = ContentPools::new(ComponentsConfig::new());
    let executor = DeferredExecutor::default();

    assert!(pools.schedule_preallocation(&app, Arc::new(Widget), &executor));
    assert_eq!(pools.len(), 1);
    executor.run_all();
    assert_eq!(pools.pool(0).unwrap().size(), 0, "not visible before drain");

    assert_eq!(pools.drain_pending(), 1);
    assert_eq!(pools.pool(0).unwrap().size(), 1);
}

#[test]
fn in_flight_preallocations_count_against_capacity() {
    let app = HostContext::application();
    let mut pools = ContentPools::new(ComponentsConfig::new());
    let executor = DeferredExecutor::default();

    assert!(pools.schedule_preallocation(&app, Arc::new(Widget), &executor));
    assert!(pools.schedule_preallocation(&app, Arc::new(Widget), &executor));
    assert!(!pools.schedule_preallocation(&app, Arc::new(Widget), &executor));
}

#[test]
fn preallocation_failures_are_reported_as_faults() {
    let app = HostContext::application();
    let mut pools = ContentPools::new(ComponentsConfig::new());

    assert!(pools.schedule_preallocation(&app, Arc::new(Broken), &InlineExecutor));
    pools.drain_pending();

    let faults = pools.take_faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].pool, "Broken");
    assert_eq!(pools.pool(0).unwrap().size(), 0);
    assert!(pools.take_faults().is_empty());
}

#[test]
fn posted_tasks_run_on_drain() {
    let app = HostContext::application();
    let mut pools = ContentPools::new(ComponentsConfig::new());
    let handle = pools.task_handle();

    let worker = std::thread::spawn(move || {
        let content = MountContent::view(&app, ());
        handle.post(Box::new(move |pools: &mut ContentPools| {
            let context = content.context().clone();
            pools.maybe_preallocate_content(&context, &Widget).unwrap();
        }))
    });
    assert!(worker.join().unwrap());

    assert!(pools.is_empty());
    assert_eq!(pools.drain_pending(), 1);
    assert_eq!(pools.len(), 1);
}
