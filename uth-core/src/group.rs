//! Nested, named scopes of checks.
//!
//! Groups form a strict LIFO stack. Checks recorded while a group is open
//! count towards the innermost group only; when that group ends its tally and
//! failure flag roll into its parent. Independently of nesting, every ended
//! group counts as one success or one failure in the run-wide group tally.

use tracing::*;

use crate::{Counter, Error, Result};

/// Outcome of one group of checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    /// Set as soon as one check in this group (or a nested group) failed.
    pub local_failed: bool,
    pub count: Counter,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Group {
        Group {
            name: name.into(),
            local_failed: false,
            count: Counter::default(),
        }
    }

    fn update(&mut self, pred: bool) {
        self.count.update(pred);
        if !pred {
            self.local_failed = true;
        }
    }

    /// Roll this group's results into its parent.
    fn spread(&self, parent: &mut Group) {
        if self.local_failed {
            parent.local_failed = true;
        }
        parent.count += self.count;
    }
}

#[derive(Debug, Default)]
pub struct GroupStack {
    groups: Vec<Group>,
    /// One unit per ended group, a success when the group did not fail.
    executed: Counter,
}

impl GroupStack {
    pub fn new() -> GroupStack {
        GroupStack::default()
    }

    /// Number of currently open groups.
    pub fn depth(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Innermost open group.
    pub fn current(&self) -> Option<&Group> {
        self.groups.last()
    }

    pub fn executed(&self) -> Counter {
        self.executed
    }

    pub fn begin(&mut self, name: impl Into<String>) {
        let group = Group::new(name);
        trace!(name = %group.name, depth = self.groups.len(), "group begin");
        self.groups.push(group);
    }

    /// Count a result towards the innermost group, if any.
    pub fn update(&mut self, pred: bool) {
        if let Some(group) = self.groups.last_mut() {
            group.update(pred);
        }
    }

    /// Close the innermost group and return it.
    pub fn end(&mut self) -> Result<Group> {
        let group = self.groups.pop().ok_or(Error::NoOpenGroup)?;

        if let Some(parent) = self.groups.last_mut() {
            group.spread(parent);
        }
        self.executed.update(!group.local_failed);

        trace!(name = %group.name, count = %group.count, failed = group.local_failed, "group end");
        Ok(group)
    }
}
