//! Column container

use std::any::Any;
use std::rc::Rc;

use rendertree_core::{Component, ComponentRef};
use rendertree_layout::{Arrangement, MeasurePolicy};

use crate::linear::{children_equivalent, Axis, LinearPolicy};

/// Stacks its children vertically. Columns are never mounted themselves.
pub struct Column {
    key: Option<String>,
    children: Vec<ComponentRef>,
    policy: LinearPolicy,
}

impl Column {
    pub fn create() -> ColumnBuilder {
        ColumnBuilder {
            key: None,
            children: Vec::new(),
            arrangement: Arrangement::Start,
        }
    }

    pub fn arrangement(&self) -> Arrangement {
        self.policy.arrangement
    }
}

impl Component for Column {
    fn name(&self) -> &'static str {
        "Column"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_equivalent_to(&self, other: &dyn Component) -> bool {
        other.downcast_ref::<Column>().is_some_and(|other| {
            self.key == other.key
                && self.policy == other.policy
                && children_equivalent(&self.children, &other.children)
        })
    }

    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn children(&self) -> Vec<ComponentRef> {
        self.children.clone()
    }

    fn measure_policy(&self) -> Option<&dyn MeasurePolicy> {
        Some(&self.policy)
    }
}

pub struct ColumnBuilder {
    key: Option<String>,
    children: Vec<ComponentRef>,
    arrangement: Arrangement,
}

impl ColumnBuilder {
    pub fn child(mut self, child: ComponentRef) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ComponentRef>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn arrangement(mut self, arrangement: Arrangement) -> Self {
        self.arrangement = arrangement;
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn build(self) -> ComponentRef {
        Rc::new(Column {
            key: self.key,
            children: self.children,
            policy: LinearPolicy::new(Axis::Vertical, self.arrangement),
        })
    }
}
