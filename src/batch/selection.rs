use crate::task::{Task, TaskId};
use std::collections::BTreeSet;

/// Task ids picked for a batch operation.
///
/// Kept apart from the (filtered) list the user is looking at; "select all"
/// only ever covers the visible tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<TaskId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one id; returns whether it is now selected
    pub fn toggle(&mut self, id: TaskId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.ids.contains(&id)
    }

    /// Replace the selection with exactly the visible tasks
    pub fn select_all(&mut self, visible: &[Task]) {
        self.ids = visible.iter().map(|t| t.id).collect();
    }

    pub fn is_all_selected(&self, visible: &[Task]) -> bool {
        !visible.is_empty() && visible.iter().all(|t| self.ids.contains(&t.id))
    }

    /// Drop ids no longer present in `visible`
    pub fn retain_visible(&mut self, visible: &[Task]) {
        self.ids.retain(|id| visible.iter().any(|t| t.id == *id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> Vec<TaskId> {
        self.ids.iter().copied().collect()
    }
}
