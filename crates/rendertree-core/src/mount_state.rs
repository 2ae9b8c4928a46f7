//! Reconciliation of calculated layouts against live content.

use std::fmt::Write as _;

use rendertree_layout::Rect;
use smallvec::SmallVec;

use crate::collections::map::{HashMap, HashSet};
use crate::{
    same_type, ContentPools, HostContext, LayoutResult, MountContent, MountError, PoolKey,
    RenderUnit, RenderUnitId,
};

type IdList = SmallVec<[RenderUnitId; 8]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindState {
    Bound,
    Unbound,
}

/// A position in the host together with the content mounted there.
pub struct MountItem {
    id: RenderUnitId,
    unit: Option<RenderUnit>,
    pool_key: Option<PoolKey>,
    content: MountContent,
    bounds: Rect,
    state: BindState,
}

impl MountItem {
    pub fn id(&self) -> RenderUnitId {
        self.id
    }

    pub fn is_host(&self) -> bool {
        self.unit.is_none()
    }

    /// The render unit currently shown; `None` for the root host.
    pub fn unit(&self) -> Option<&RenderUnit> {
        self.unit.as_ref()
    }

    pub fn content(&self) -> &MountContent {
        &self.content
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn state(&self) -> BindState {
        self.state
    }

    fn needs_update(&self, next: &RenderUnit) -> bool {
        let Some(current) = &self.unit else {
            return false;
        };
        next.component.should_update(current.component.as_ref())
            || (next.spec.is_mount_size_dependent() && !self.bounds.same_size(&next.bounds))
    }
}

/// Owns every item mounted in one host. The root host item always exists at
/// [`RenderUnitId::ROOT`].
pub struct MountState {
    host: HostContext,
    items: HashMap<RenderUnitId, MountItem>,
    order: Vec<RenderUnitId>,
    poisoned: HashSet<RenderUnitId>,
}

impl MountState {
    pub fn new(host: HostContext) -> Self {
        let mut items = HashMap::new();
        items.insert(
            RenderUnitId::ROOT,
            MountItem {
                id: RenderUnitId::ROOT,
                unit: None,
                pool_key: None,
                content: MountContent::host(&host),
                bounds: Rect::default(),
                state: BindState::Bound,
            },
        );
        Self {
            host,
            items,
            order: Vec::new(),
            poisoned: HashSet::new(),
        }
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    /// Reconciles the mounted items with `layout`.
    ///
    /// Removed and retyped positions are unmounted first, children before
    /// parents; then new positions are mounted and changed ones updated in
    /// place. A callback failure aborts the pass.
    pub fn mount(
        &mut self,
        layout: &LayoutResult,
        pools: &mut ContentPools,
    ) -> Result<(), MountError> {
        let units = layout.render_units();
        if let Some(unit) = units.iter().find(|unit| self.poisoned.contains(&unit.id)) {
            return Err(MountError::Poisoned { id: unit.id });
        }
        if let Some(root) = self.items.get_mut(&RenderUnitId::ROOT) {
            root.bounds = Rect::from_size(layout.size());
        }

        let incoming: HashSet<RenderUnitId> = units.iter().map(|unit| unit.id).collect();
        let mut superseded: IdList = self
            .order
            .iter()
            .rev()
            .filter(|id| !incoming.contains(*id))
            .copied()
            .collect();
        superseded.extend(units.iter().rev().filter_map(|unit| {
            let item = self.items.get(&unit.id)?;
            let current = item.unit.as_ref()?;
            (!same_type(current.component.as_ref(), unit.component.as_ref())).then_some(unit.id)
        }));
        for id in superseded {
            self.unmount_item(id, pools)?;
        }

        for unit in units {
            let needs_update = match self.items.get(&unit.id) {
                Some(item) => item.needs_update(unit),
                None => {
                    self.mount_unit(unit, pools)?;
                    continue;
                }
            };
            if needs_update {
                self.update_item(unit)?;
            } else if let Some(item) = self.items.get_mut(&unit.id) {
                log::trace!("keeping {} at {}", unit.component.name(), unit.id);
                item.unit = Some(unit.clone());
                item.bounds = unit.bounds;
            }
        }
        self.order = units.iter().map(|unit| unit.id).collect();
        Ok(())
    }

    fn mount_unit(&mut self, unit: &RenderUnit, pools: &mut ContentPools) -> Result<(), MountError> {
        let name = unit.component.name();
        let spec = unit.spec.as_ref();
        log::trace!("mounting {} at {}", name, unit.id);
        let pool_key = (spec.pool_size() > 0).then(|| pools.pool_key(&self.host, spec));
        let mut content = pools
            .acquire_or_create(&self.host, spec)
            .map_err(MountError::callback(name, "create_mount_content"))?;
        unit.component
            .on_mount(&unit.context, &mut content)
            .map_err(MountError::callback(name, "on_mount"))?;
        let mut item = MountItem {
            id: unit.id,
            unit: Some(unit.clone()),
            pool_key,
            content,
            bounds: unit.bounds,
            state: BindState::Unbound,
        };
        let bound = unit.component.on_bind(&unit.context, &mut item.content);
        if bound.is_ok() {
            item.state = BindState::Bound;
        }
        self.items.insert(unit.id, item);
        self.order.push(unit.id);
        bound.map_err(MountError::callback(name, "on_bind"))
    }

    /// Moves the content at `next.id` from its current component to `next`
    /// without releasing it.
    fn update_item(&mut self, next: &RenderUnit) -> Result<(), MountError> {
        let id = next.id;
        let item = self
            .items
            .get_mut(&id)
            .ok_or(MountError::MissingItem { id })?;
        let Some(current) = item.unit.clone() else {
            return Err(MountError::HostItem);
        };
        log::trace!("updating {} at {}", next.component.name(), id);
        let name = current.component.name();
        if item.state == BindState::Bound {
            if let Err(source) = current.component.on_unbind(&current.context, &mut item.content) {
                self.poisoned.insert(id);
                return Err(MountError::callback(name, "on_unbind")(source));
            }
            item.state = BindState::Unbound;
        }
        if let Err(source) = current.component.on_unmount(&current.context, &mut item.content) {
            self.poisoned.insert(id);
            return Err(MountError::callback(name, "on_unmount")(source));
        }
        let name = next.component.name();
        if let Err(source) = next.component.on_mount(&next.context, &mut item.content) {
            self.items.remove(&id);
            self.order.retain(|other| *other != id);
            return Err(MountError::callback(name, "on_mount")(source));
        }
        item.unit = Some(next.clone());
        item.bounds = next.bounds;
        next.component
            .on_bind(&next.context, &mut item.content)
            .map_err(MountError::callback(name, "on_bind"))?;
        item.state = BindState::Bound;
        Ok(())
    }

    /// Unbinds and unmounts the item at `id`, releasing its content to its
    /// pool. The root host cannot be unmounted.
    pub fn unmount_item(
        &mut self,
        id: RenderUnitId,
        pools: &mut ContentPools,
    ) -> Result<(), MountError> {
        if id.is_root() {
            return Err(MountError::HostItem);
        }
        let mut item = self
            .items
            .remove(&id)
            .ok_or(MountError::MissingItem { id })?;
        self.order.retain(|other| *other != id);
        let Some(unit) = item.unit.take() else {
            return Err(MountError::HostItem);
        };
        let name = unit.component.name();
        log::trace!("unmounting {} at {}", name, id);
        if item.state == BindState::Bound {
            if let Err(source) = unit.component.on_unbind(&unit.context, &mut item.content) {
                self.poisoned.insert(id);
                return Err(MountError::callback(name, "on_unbind")(source));
            }
        }
        if let Err(source) = unit.component.on_unmount(&unit.context, &mut item.content) {
            self.poisoned.insert(id);
            return Err(MountError::callback(name, "on_unmount")(source));
        }
        if let Some(key) = item.pool_key {
            if !pools.release(&key, item.content) {
                log::trace!("pool {} is full, dropping content", key.name);
            }
        }
        Ok(())
    }

    /// Unmounts every item except the root host, last mounted first.
    pub fn unmount_all_items(&mut self, pools: &mut ContentPools) -> Result<(), MountError> {
        let ids: IdList = self.order.iter().rev().copied().collect();
        for id in ids {
            self.unmount_item(id, pools)?;
        }
        Ok(())
    }

    /// Unbinds every bound item, keeping its content mounted.
    pub fn detach(&mut self) -> Result<(), MountError> {
        for id in &self.order {
            let Some(item) = self.items.get_mut(id) else {
                continue;
            };
            let Some(unit) = &item.unit else {
                continue;
            };
            if item.state == BindState::Bound {
                unit.component
                    .on_unbind(&unit.context, &mut item.content)
                    .map_err(MountError::callback(unit.component.name(), "on_unbind"))?;
                item.state = BindState::Unbound;
            }
        }
        Ok(())
    }

    /// Binds every item left unbound by [`MountState::detach`].
    pub fn reattach(&mut self) -> Result<(), MountError> {
        for id in &self.order {
            let Some(item) = self.items.get_mut(id) else {
                continue;
            };
            let Some(unit) = &item.unit else {
                continue;
            };
            if item.state == BindState::Unbound {
                unit.component
                    .on_bind(&unit.context, &mut item.content)
                    .map_err(MountError::callback(unit.component.name(), "on_bind"))?;
                item.state = BindState::Bound;
            }
        }
        Ok(())
    }

    /// Forgets positions poisoned by failed unmounts.
    pub(crate) fn clear_poisoned(&mut self) {
        self.poisoned.clear();
    }

    pub fn item(&self, id: RenderUnitId) -> Option<&MountItem> {
        self.items.get(&id)
    }

    /// The root host followed by every mounted item in mount order.
    pub fn items(&self) -> impl Iterator<Item = &MountItem> {
        std::iter::once(RenderUnitId::ROOT)
            .chain(self.order.iter().copied())
            .filter_map(|id| self.items.get(&id))
    }

    /// Number of entries in the id to item map, root host included.
    pub fn mount_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_bound(&self, id: RenderUnitId) -> bool {
        self.items
            .get(&id)
            .is_some_and(|item| item.state == BindState::Bound)
    }

    pub fn is_poisoned(&self, id: RenderUnitId) -> bool {
        self.poisoned.contains(&id)
    }

    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        for item in self.items() {
            let label = match &item.unit {
                Some(unit) => unit.context.key().to_string(),
                None => "<host>".to_string(),
            };
            let b = item.bounds;
            let _ = writeln!(
                out,
                "{} {} ({},{} {}x{}) {:?}",
                item.id, label, b.x, b.y, b.width, b.height, item.state
            );
        }
        out
    }
}

#[cfg(test)]
#[path = "tests/mount_state_tests.rs"]
mod tests;
